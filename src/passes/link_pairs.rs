use std::sync::LazyLock;

use regex::Regex;

use crate::model::{CourseCollection, CourseRecord};
use crate::report::{Change, ChangeLog};

// name runs until a period, one of the words that usually starts the next
// sentence, or the end of the notes; a level pair like "3-4" stays in
static LINKED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)linked w/\s*([^.]+?)(?:\s+(?:Alternate|For|This|The|Advanced|U\.S\.|Honors)\b|\.|$)")
        .unwrap()
});
static LEVEL_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\d+-\d+$").unwrap());

/// Course name mentioned as "linked w/ <name>" in the notes.
pub fn linked_name(notes: &str) -> Option<String> {
    let caps = LINKED_RE.captures(notes)?;
    let name = caps[1].trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// Exact name first, then looser matches on the full mention, then the same
/// again with the level pair dropped. Never the course itself.
fn find_partner<'a>(courses: &'a [CourseRecord], own_id: &str, mention: &str) -> Option<&'a CourseRecord> {
    let full = mention.to_uppercase();
    let base = LEVEL_TAIL_RE.replace(&full, "").trim().to_string();
    let mut wanted = vec![full];
    if base != wanted[0] && !base.is_empty() {
        wanted.push(base);
    }

    let others = || courses.iter().filter(move |c| c.id != own_id);
    wanted.iter().find_map(|w| {
        others()
            .find(|c| c.name.to_uppercase() == *w)
            .or_else(|| others().find(|c| c.name.to_uppercase().contains(w.as_str())))
            .or_else(|| others().find(|c| w.contains(&c.name.to_uppercase())))
    })
}

pub fn apply(collection: &mut CourseCollection, log: &mut ChangeLog) -> usize {
    let mut links: Vec<(usize, String)> = Vec::new();
    for (i, course) in collection.courses.iter().enumerate() {
        let Some(mention) = linked_name(&course.notes) else {
            continue;
        };
        match find_partner(&collection.courses, &course.id, &mention) {
            Some(partner) => links.push((i, partner.id.clone())),
            None => log.note(&format!("no course found for \"{}\" (from {})", mention, course.name)),
        }
    }

    let mut changed = 0;
    for (i, partner_id) in links {
        let course = &mut collection.courses[i];
        if course.pair_course_id.as_deref() == Some(partner_id.as_str()) && course.is_ap_or_honors_pair {
            continue;
        }
        let before = course.pair_course_id.clone().unwrap_or_else(|| "-".to_string());
        course.pair_course_id = Some(partner_id.clone());
        course.is_ap_or_honors_pair = true;
        log.record(Change {
            course_id: course.id.clone(),
            course_name: course.name.clone(),
            field: "pair_course_id",
            before,
            after: partner_id,
        });
        changed += 1;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pathway;
    use crate::passes::testing::*;
    use crate::passes::PassId;

    #[test]
    fn mention_extraction() {
        assert_eq!(
            linked_name("This course is linked w/ AP US History 1-2. Open to 11th graders.").as_deref(),
            Some("AP US History 1-2")
        );
        assert_eq!(
            linked_name("Linked w/ Honors Chemistry The lab fee applies").as_deref(),
            Some("Honors Chemistry")
        );
        assert_eq!(linked_name("linked w/ English 3-4").as_deref(), Some("English 3-4"));
        assert_eq!(
            linked_name("Linked w/ Theory of Knowledge for seniors").as_deref(),
            Some("Theory of Knowledge")
        );
        assert_eq!(linked_name("Students write essays."), None);
    }

    #[test]
    fn pairs_are_set_when_partner_exists() {
        let mut english = course("ENG_34", "ENGLISH 3-4 HONORS", Pathway::English);
        english.notes = "Honors section, linked w/ AP Language and Composition".into();
        let mut ap = course("AP_LANG", "AP LANGUAGE AND COMPOSITION", Pathway::English);
        ap.notes = "College level writing.".into();
        let mut orphan = course("X", "ORPHAN", Pathway::Electives);
        orphan.notes = "linked w/ Nonexistent Course".into();

        let mut c = collection(vec![english, ap, orphan]);
        assert_eq!(run(PassId::LinkPairs, &mut c), 1);
        let e = c.find("ENG_34").unwrap();
        assert_eq!(e.pair_course_id.as_deref(), Some("AP_LANG"));
        assert!(e.is_ap_or_honors_pair);
        assert_eq!(c.find("X").unwrap().pair_course_id, None);
    }

    #[test]
    fn level_pair_picks_the_matching_course() {
        let a = course("A", "HIGH SCHOOL ENGLISH 1-2", Pathway::English);
        let b = course("B", "ENGLISH 3-4", Pathway::English);
        let mut h = course("H", "ENGLISH 3-4 HONORS", Pathway::English);
        h.notes = "linked w/ English 3-4".into();

        let mut c = collection(vec![a, b, h]);
        assert_eq!(run(PassId::LinkPairs, &mut c), 1);
        assert_eq!(c.find("H").unwrap().pair_course_id.as_deref(), Some("B"));
    }

    #[test]
    fn unknown_level_falls_back_to_the_course_name() {
        let b = course("B", "AP BIOLOGY", Pathway::ScienceBiological);
        let mut h = course("H", "BIOLOGY HONORS", Pathway::ScienceBiological);
        h.notes = "linked w/ AP Biology 1-2".into();

        let mut c = collection(vec![b, h]);
        assert_eq!(run(PassId::LinkPairs, &mut c), 1);
        assert_eq!(c.find("H").unwrap().pair_course_id.as_deref(), Some("B"));
    }

    #[test]
    fn a_course_never_pairs_with_itself() {
        let mut only = course("A", "AP BIOLOGY", Pathway::ScienceBiological);
        only.notes = "linked w/ AP Biology".into();
        let mut c = collection(vec![only]);
        assert_eq!(run(PassId::LinkPairs, &mut c), 0);
    }

    #[test]
    fn idempotent() {
        let mut a = course("A", "CHEMISTRY HONORS", Pathway::SciencePhysical);
        a.notes = "linked w/ Chemistry 1-2".into();
        let b = course("B", "CHEMISTRY 1-2", Pathway::SciencePhysical);
        let mut c = collection(vec![a, b]);
        assert_idempotent(PassId::LinkPairs, &mut c);
        assert_eq!(c.find("A").unwrap().pair_course_id.as_deref(), Some("B"));
    }
}
