use crate::model::{CourseRecord, Pathway, TermLength};
use crate::rules::{Action, Rule, RuleSet};

/// Level pairs that mark a one-semester language level.
pub const LEVEL_PAIRS: &[&str] = &["1-2", "3-4", "5-6", "7-8", "9-10"];

fn has_level_pair(name: &str) -> bool {
    LEVEL_PAIRS.iter().any(|l| name.contains(l))
}

/// For Foreign Language only, a level pair means one semester per level.
/// Extraction reads the same suffix as yearlong and keeps doing so for every
/// other pathway.
pub fn rules() -> RuleSet {
    RuleSet::new(vec![Rule::new(
        "level pair is a semester",
        |c: &CourseRecord| {
            c.pathway == Pathway::ForeignLanguage
                && c.term_length == TermLength::Yearlong
                && has_level_pair(&c.name)
        },
        Action::SetTermLength(TermLength::Semester),
    )])
}
