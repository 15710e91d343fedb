//! Collapse the extraction vocabulary onto the canonical eleven pathways.
//!
//! Rule order, top to bottom: specific program keywords, the science split,
//! cross-category moves keyed on the current pathway, then the legacy label
//! map for whatever nothing more specific claimed.

use crate::model::{CourseRecord, Pathway};
use crate::rules::{Action, Rule, RuleSet};
use crate::utils::contains_any;

const BIOLOGY_WORDS: &[&str] = &[
    "BIOLOGY",
    "BIOMEDICAL",
    "ZOOLOGY",
    "ANATOMY",
    "PHYSIOLOGY",
    "MEDICAL",
    "HUMAN BODY",
    "MARINE SCIENCE",
];

const PHYSICAL_WORDS: &[&str] = &["CHEMISTRY", "PHYSICS", "ENVIRONMENTAL SCIENCE"];

const FINE_ARTS_WORDS: &[&str] = &[
    "DRAMA",
    "ORCHESTRA",
    "MUSIC",
    "BAND",
    "CHOIR",
    "THEATER",
    "THEATRE",
    "DANCE",
    "PHOTOGRAPHY",
    "FILM",
    "ANIMATION",
    "CERAMICS",
    "SCULPTURE",
    "DRAWING",
    "PAINTING",
];

/// Journalism, yearbook and broadcast are Electives, not Fine Arts.
const ELECTIVE_WORDS: &[&str] = &[
    "COMPUTER INFORMATION SYSTEMS",
    "DATA STRUCTURES",
    "JOURNALISM",
    "YEARBOOK",
    "BROADCAST",
];

pub const LEGACY_MAP: &[(Pathway, Pathway)] = &[
    (Pathway::Mathematics, Pathway::Math),
    (Pathway::VisualPerformingArts, Pathway::FineArts),
    (Pathway::WorldLanguage, Pathway::ForeignLanguage),
    (Pathway::CareerTechnicalEducation, Pathway::Cte),
    (Pathway::ComputerScienceEngineering, Pathway::Cte),
    (Pathway::ScienceGeneral, Pathway::SciencePhysical),
    (Pathway::Science, Pathway::SciencePhysical),
    (Pathway::Elective, Pathway::Electives),
];

fn upper(c: &CourseRecord) -> String {
    c.name.to_uppercase()
}

fn is_engineering_program(name: &str) -> bool {
    name.contains("PLTW")
        || (name.contains("ENGINEERING") && name.contains("DESIGN"))
        || name.contains("CIVIL ENGINEERING")
        || name.contains("COMPUTER INTEGRATED MANUFACTURING")
        || (name.contains("COMPUTER SCIENCE") && name.contains("SOFTWARE ENGINEERING"))
}

fn is_pe_in_disguise(name: &str) -> bool {
    (name.contains("SPORTS") && !name.contains("E-SPORTS"))
        || name.contains("UNIFIED PE")
        || name.starts_with("MARCHING PE")
}

pub fn rules() -> RuleSet {
    RuleSet::new(vec![
        Rule::name_contains("avid", &["AVID"], Action::SetPathway(Pathway::Electives)),
        Rule::new(
            "engineering program",
            |c| is_engineering_program(&upper(c)),
            Action::SetPathway(Pathway::Electives),
        ),
        Rule::name_contains(
            "filipino",
            &["FILIPINO"],
            Action::SetPathway(Pathway::ForeignLanguage),
        ),
        Rule::name_contains(
            "ap cs a",
            &["AP COMPUTER SCIENCE A"],
            Action::SetPathway(Pathway::Math),
        ),
        Rule::name_contains(
            "ap cs principles",
            &["AP COMPUTER SCIENCE PRINCIPLES"],
            Action::SetPathway(Pathway::SciencePhysical),
        ),
        Rule::name_contains("electives", ELECTIVE_WORDS, Action::SetPathway(Pathway::Electives)),
        Rule::name_contains(
            "writing seminar",
            &["WRITING SEMINAR"],
            Action::SetPathway(Pathway::English),
        ),
        Rule::new(
            "biological science",
            |c| c.pathway.is_science() && contains_any(&upper(c), BIOLOGY_WORDS),
            Action::SetPathway(Pathway::ScienceBiological),
        ),
        Rule::new(
            "physical science",
            |c| c.pathway.is_science() && contains_any(&upper(c), PHYSICAL_WORDS),
            Action::SetPathway(Pathway::SciencePhysical),
        ),
        Rule::new(
            "fine arts filed as english",
            |c| c.pathway == Pathway::English && contains_any(&upper(c), FINE_ARTS_WORDS),
            Action::SetPathway(Pathway::FineArts),
        ),
        Rule::new(
            "pe filed as fine arts",
            |c| c.pathway == Pathway::FineArts && is_pe_in_disguise(&upper(c)),
            Action::SetPathway(Pathway::PhysicalEducation),
        ),
        Rule::relabel("legacy labels", LEGACY_MAP),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::testing::*;
    use crate::passes::PassId;

    fn after(name: &str, pathway: Pathway) -> Pathway {
        let mut c = collection(vec![course("X", name, pathway)]);
        run(PassId::Consolidate, &mut c);
        c.courses[0].pathway.clone()
    }

    #[test]
    fn keyword_triggers_beat_the_legacy_map() {
        assert_eq!(after("AVID 9", Pathway::Mathematics), Pathway::Electives);
        assert_eq!(after("PLTW INTRO TO ENGINEERING DESIGN", Pathway::ComputerScienceEngineering), Pathway::Electives);
        assert_eq!(after("FILIPINO 1-2", Pathway::Elective), Pathway::ForeignLanguage);
        assert_eq!(after("AP COMPUTER SCIENCE A", Pathway::ComputerScienceEngineering), Pathway::Math);
        assert_eq!(
            after("AP COMPUTER SCIENCE PRINCIPLES", Pathway::ComputerScienceEngineering),
            Pathway::SciencePhysical
        );
        assert_eq!(after("JOURNALISM 1-2", Pathway::English), Pathway::Electives);
        assert_eq!(after("YEARBOOK", Pathway::VisualPerformingArts), Pathway::Electives);
        assert_eq!(after("WRITING SEMINAR", Pathway::Elective), Pathway::English);
    }

    #[test]
    fn science_split() {
        assert_eq!(after("MARINE SCIENCE", Pathway::ScienceGeneral), Pathway::ScienceBiological);
        assert_eq!(after("HUMAN ANATOMY", Pathway::SciencePhysical), Pathway::ScienceBiological);
        assert_eq!(after("CHEMISTRY 1-2", Pathway::Science), Pathway::SciencePhysical);
        assert_eq!(after("NAVAL SCIENCE 1-2", Pathway::ScienceGeneral), Pathway::SciencePhysical);
        // keywords only move records already in a science pathway
        assert_eq!(after("MEDICAL TERMINOLOGY", Pathway::CareerTechnicalEducation), Pathway::Cte);
    }

    #[test]
    fn cross_category_moves() {
        assert_eq!(after("DRAMA 1-2", Pathway::English), Pathway::FineArts);
        assert_eq!(after("SHAKESPEARE AND FILM", Pathway::English), Pathway::FineArts);
        assert_eq!(after("SPORTS MEDICINE", Pathway::FineArts), Pathway::PhysicalEducation);
        assert_eq!(after("E-SPORTS DESIGN", Pathway::FineArts), Pathway::FineArts);
        assert_eq!(after("MARCHING PE", Pathway::VisualPerformingArts), Pathway::PhysicalEducation);
        assert_eq!(after("AMERICAN LITERATURE", Pathway::English), Pathway::English);
    }

    #[test]
    fn legacy_map_covers_every_extraction_label() {
        for (from, to) in LEGACY_MAP {
            assert!(!from.is_canonical());
            assert!(to.is_canonical());
        }
        for p in crate::parser::pathway::PATHWAY_RULES.iter().map(|(_, p)| p) {
            assert!(p.is_canonical() || LEGACY_MAP.iter().any(|(from, _)| from == p), "{}", p);
        }
        assert_eq!(after("STUDY HALL", Pathway::Elective), Pathway::Electives);
    }

    #[test]
    fn idempotent() {
        let mut c = collection(vec![
            course("A", "SPORTS MEDICINE", Pathway::VisualPerformingArts),
            course("B", "DRAMA 1-2", Pathway::English),
            course("C", "BIOLOGY 1-2", Pathway::ScienceBiological),
            course("D", "CALCULUS", Pathway::Mathematics),
            course("E", "AVID 10", Pathway::Electives),
        ]);
        assert_idempotent(PassId::Consolidate, &mut c);
        assert_eq!(c.courses[0].pathway, Pathway::PhysicalEducation);
    }
}
