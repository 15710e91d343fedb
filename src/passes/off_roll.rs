use crate::model::{CourseCollection, CourseRecord, CreditType, Pathway, TermLength};
use crate::report::{Change, ChangeLog};
use crate::rules::{Action, Rule, RuleSet};
use crate::utils::contains_any;

/// Reserved id of the "not enrolled in any course" record.
pub const SENTINEL_ID: &str = "OFF_ROLL_PLACEHOLDER";

const OFF_ROLL_WORDS: &[&str] = &["TUTOR", "AIDE", "ASSISTANT"];

/// Where named courses go when they are pulled back out of Off-Roll.
pub const RETURN_MAP: &[(&str, Pathway)] = &[
    ("ACADEMIC TUTOR (All Subjects)", Pathway::Electives),
    ("ACADEMIC TUTOR (Science)", Pathway::SciencePhysical),
    (
        "LIBRARY & INFORMATION SCIENCE TEACHING ASSISTANT 1-2",
        Pathway::SciencePhysical,
    ),
    ("VOCATIONAL LEARNING ASSISTANT", Pathway::SciencePhysical),
];

pub fn add_rules() -> RuleSet {
    RuleSet::new(vec![Rule::new(
        "tutor/aide/assistant",
        |c| c.id != SENTINEL_ID && contains_any(&c.name.to_uppercase(), OFF_ROLL_WORDS),
        Action::SetPathway(Pathway::OffRoll),
    )])
}

pub fn repair_rules() -> RuleSet {
    RuleSet::new(
        RETURN_MAP
            .iter()
            .map(|(name, target)| {
                let name = *name;
                Rule::new(
                    "return from off-roll",
                    move |c| c.pathway == Pathway::OffRoll && c.name == name,
                    Action::SetPathway(target.clone()),
                )
            })
            .collect(),
    )
}

pub fn sentinel() -> CourseRecord {
    let mut c = CourseRecord::blank(SENTINEL_ID, "Off-Roll (Not Attending School)", Pathway::OffRoll);
    c.credits = 0.0;
    c.credit_type = CreditType::Partial;
    c.term_length = TermLength::Semester;
    c.notes = "Select this option when the student is not taking courses at this school during \
               this semester (e.g., attending another school, independent study, etc.)"
        .to_string();
    c
}

/// Named courses out of Off-Roll, then make sure the sentinel exists.
pub fn repair(collection: &mut CourseCollection, log: &mut ChangeLog) -> usize {
    let mut changed = repair_rules().apply(&mut collection.courses, log);

    if collection.find(SENTINEL_ID).is_none() {
        let record = sentinel();
        log.record(Change {
            course_id: record.id.clone(),
            course_name: record.name.clone(),
            field: "course",
            before: "(absent)".to_string(),
            after: "added".to_string(),
        });
        collection.courses.push(record);
        changed += 1;
    }

    let remaining: Vec<&str> = collection
        .courses
        .iter()
        .filter(|c| c.pathway == Pathway::OffRoll && c.id != SENTINEL_ID)
        .map(|c| c.name.as_str())
        .collect();
    if !remaining.is_empty() {
        log.note(&format!("{} course(s) still in Off-Roll: {}", remaining.len(), remaining.join(", ")));
    }
    changed
}
