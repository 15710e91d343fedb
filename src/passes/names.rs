use crate::rules::{Action, Rule, RuleSet};

const PREFIXES: &[(&str, &str, &str)] = &[
    ("special ed", "L/", "Special Ed "),
    ("ell", "ELL ", "English Language Learner (ELL) "),
    ("eld", "ELD ", "English Language Development (ELD) "),
];

/// Catalog shorthand prefixes, expanded once.
pub fn rules() -> RuleSet {
    RuleSet::new(
        PREFIXES
            .iter()
            .map(|&(name, prefix, replacement)| {
                Rule::new(
                    name,
                    move |c| c.name.starts_with(prefix),
                    Action::ExpandPrefix {
                        prefix,
                        replacement,
                    },
                )
            })
            .collect(),
    )
}
