use std::sync::LazyLock;

use regex::Regex;

use crate::model::Pathway;
use crate::rules::{Action, Rule, RuleSet};

// "ENS" as a token of the name or id, not inside "DEFENSE" or "LENS"
static ENS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:^|[^A-Z])ENS(?:[^A-Z]|$)").unwrap());

/// Known misfilings, written against the extraction vocabulary.
pub fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::new(
            "ens",
            |c| ENS_RE.is_match(&c.name.to_uppercase()) || ENS_RE.is_match(&c.id),
            Action::SetPathway(Pathway::PhysicalEducation),
        ),
        Rule::name_contains(
            "digital media production",
            &["DIGITAL MEDIA PRODUCTION"],
            Action::SetPathway(Pathway::VisualPerformingArts),
        ),
        Rule::name_contains(
            "design and mixed media",
            &["DESIGN AND MIXED MEDIA"],
            Action::SetPathway(Pathway::VisualPerformingArts),
        ),
        // the studio-art photography course keeps its pathway
        Rule::exact_name(
            "digital photography",
            "DIGITAL PHOTOGRAPHY 1-2",
            Action::SetPathway(Pathway::VisualPerformingArts),
        ),
        Rule::name_contains(
            "digital electronics",
            &["DIGITAL ELECTRONICS"],
            Action::SetPathway(Pathway::CareerTechnicalEducation),
        ),
    ])
}
