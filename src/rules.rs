//! Ordered (predicate, action) rule tables.
//!
//! A pass is a list of rules. For each record the first rule whose predicate
//! holds is the one that fires; nothing after it is looked at in that sweep.
//! A rule that fires but finds the field already at its target changes
//! nothing and still ends the sweep.
//!
//! When a rule does change the record, the record is swept again, so a pass
//! always leaves its records at a fixed point and re-running it is a no-op.

use crate::model::{CourseRecord, Pathway, TermLength};
use crate::report::{Change, ChangeLog};

type Predicate = Box<dyn Fn(&CourseRecord) -> bool + Send + Sync>;

#[derive(Debug, Clone)]
pub enum Action {
    SetPathway(Pathway),
    /// Straight relabel table, looked up by the current pathway.
    RelabelPathway(&'static [(Pathway, Pathway)]),
    SetTermLength(TermLength),
    /// Replace a leading `prefix` of the name with `replacement`.
    ExpandPrefix {
        prefix: &'static str,
        replacement: &'static str,
    },
}

impl Action {
    /// Mutate `course`; `None` when it already holds the target value.
    pub fn apply(&self, course: &mut CourseRecord) -> Option<Change> {
        let (field, before, after) = match self {
            Action::SetPathway(target) => {
                if &course.pathway == target {
                    return None;
                }
                let before = std::mem::replace(&mut course.pathway, target.clone());
                ("pathway", before.to_string(), target.to_string())
            }
            Action::RelabelPathway(table) => {
                let target = relabel(table, &course.pathway)?;
                if course.pathway == *target {
                    return None;
                }
                let before = std::mem::replace(&mut course.pathway, target.clone());
                ("pathway", before.to_string(), target.to_string())
            }
            Action::SetTermLength(target) => {
                if course.term_length == *target {
                    return None;
                }
                let before = std::mem::replace(&mut course.term_length, *target);
                ("term_length", before.to_string(), target.to_string())
            }
            Action::ExpandPrefix {
                prefix,
                replacement,
            } => {
                let rest = course.name.strip_prefix(prefix)?;
                let renamed = format!("{}{}", replacement, rest);
                let before = std::mem::replace(&mut course.name, renamed.clone());
                ("full_name", before, renamed)
            }
        };
        Some(Change {
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            field,
            before,
            after,
        })
    }
}

pub fn relabel<'a>(table: &'a [(Pathway, Pathway)], current: &Pathway) -> Option<&'a Pathway> {
    table
        .iter()
        .find(|(from, _)| from == current)
        .map(|(_, to)| to)
}

pub struct Rule {
    pub name: &'static str,
    when: Predicate,
    pub action: Action,
}

impl Rule {
    pub fn new<F>(name: &'static str, when: F, action: Action) -> Self
    where
        F: Fn(&CourseRecord) -> bool + Send + Sync + 'static,
    {
        Rule {
            name,
            when: Box::new(when),
            action,
        }
    }

    /// Fires on exactly one full name.
    pub fn exact_name(name: &'static str, course_name: &'static str, action: Action) -> Self {
        Rule::new(name, move |c| c.name == course_name, action)
    }

    /// Fires when the uppercased name contains any of `words`.
    pub fn name_contains(name: &'static str, words: &'static [&'static str], action: Action) -> Self {
        Rule::new(
            name,
            move |c| {
                let upper = c.name.to_uppercase();
                words.iter().any(|w| upper.contains(w))
            },
            action,
        )
    }

    /// Fires when the current pathway is a key of `table`.
    pub fn relabel(name: &'static str, table: &'static [(Pathway, Pathway)]) -> Self {
        Rule::new(
            name,
            move |c| relabel(table, &c.pathway).is_some(),
            Action::RelabelPathway(table),
        )
    }

    pub fn matches(&self, course: &CourseRecord) -> bool {
        (self.when)(course)
    }
}

pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSet { rules }
    }

    /// The rule that would fire for `course`, if any.
    pub fn first_match(&self, course: &CourseRecord) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(course))
    }

    /// One sweep: fire the first matching rule.
    pub fn apply_once(&self, course: &mut CourseRecord) -> Option<Change> {
        let rule = self.first_match(course)?;
        let change = rule.action.apply(course);
        if change.is_some() {
            tracing::debug!(rule = rule.name, course = %course.id, "rule fired");
        }
        change
    }

    /// Sweep every record until it settles. Returns the number of changes.
    pub fn apply(&self, courses: &mut [CourseRecord], log: &mut ChangeLog) -> usize {
        let before = log.len();
        for course in courses.iter_mut() {
            // each change moves the record under a different rule; more sweeps
            // than rules means two rules keep undoing each other
            for _ in 0..=self.rules.len() {
                match self.apply_once(course) {
                    Some(change) => log.record(change),
                    None => break,
                }
            }
            if self.apply_once(&mut course.clone()).is_some() {
                tracing::warn!(course = %course.id, "rules did not settle");
            }
        }
        log.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &[(Pathway, Pathway)] = &[
        (Pathway::VisualPerformingArts, Pathway::FineArts),
        (Pathway::Elective, Pathway::Electives),
    ];

    fn course(name: &str, pathway: Pathway) -> CourseRecord {
        CourseRecord::blank(name, name, pathway)
    }

    #[test]
    fn first_matching_rule_wins() {
        let set = RuleSet::new(vec![
            Rule::name_contains("avid", &["AVID"], Action::SetPathway(Pathway::Electives)),
            Rule::name_contains("math", &["MATH"], Action::SetPathway(Pathway::Math)),
        ]);
        let c = course("AVID MATH SUPPORT", Pathway::Elective);
        assert_eq!(set.first_match(&c).map(|r| r.name), Some("avid"));
    }

    #[test]
    fn a_no_op_firing_still_stops_the_sweep() {
        let set = RuleSet::new(vec![
            Rule::name_contains("avid", &["AVID"], Action::SetPathway(Pathway::Electives)),
            Rule::name_contains("math", &["MATH"], Action::SetPathway(Pathway::Math)),
        ]);
        let mut courses = vec![course("AVID MATH SUPPORT", Pathway::Electives)];
        let mut log = ChangeLog::quiet("t");
        assert_eq!(set.apply(&mut courses, &mut log), 0);
        assert_eq!(courses[0].pathway, Pathway::Electives);
    }

    #[test]
    fn changed_records_are_swept_again() {
        let set = RuleSet::new(vec![
            Rule::new(
                "sports out of fine arts",
                |c| c.pathway == Pathway::FineArts && c.name.contains("SPORTS"),
                Action::SetPathway(Pathway::PhysicalEducation),
            ),
            Rule::relabel("legacy", LEGACY),
        ]);
        let mut courses = vec![course("SPORTS MEDIA", Pathway::VisualPerformingArts)];
        let mut log = ChangeLog::quiet("t");
        assert_eq!(set.apply(&mut courses, &mut log), 2);
        assert_eq!(courses[0].pathway, Pathway::PhysicalEducation);

        let mut again = ChangeLog::quiet("t");
        assert_eq!(set.apply(&mut courses, &mut again), 0);
    }

    #[test]
    fn relabel_ignores_unlisted_pathways() {
        let rule = Rule::relabel("legacy", LEGACY);
        assert!(!rule.matches(&course("X", Pathway::Math)));
        let mut c = course("X", Pathway::Elective);
        let change = rule.action.apply(&mut c).unwrap();
        assert_eq!((change.before.as_str(), change.after.as_str()), ("Elective", "Electives"));
    }

    #[test]
    fn prefix_expansion() {
        let action = Action::ExpandPrefix {
            prefix: "L/",
            replacement: "Special Ed ",
        };
        let mut c = course("L/ENGLISH 3-4", Pathway::English);
        let change = action.apply(&mut c).unwrap();
        assert_eq!(c.name, "Special Ed ENGLISH 3-4");
        assert_eq!(change.before, "L/ENGLISH 3-4");
        assert!(action.apply(&mut c).is_none());
    }

    #[test]
    fn term_length_action() {
        let action = Action::SetTermLength(TermLength::Semester);
        let mut c = course("SPANISH 3-4", Pathway::ForeignLanguage);
        assert_eq!(action.apply(&mut c).unwrap().after, "semester");
        assert!(action.apply(&mut c).is_none());
    }
}
