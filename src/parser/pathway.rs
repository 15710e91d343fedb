use crate::model::Pathway;
use crate::utils::contains_any;

/// Extraction-time subject rules, checked top to bottom against the uppercased
/// name and description. Order is precedence: languages before everything,
/// biology before physical science before the bare "SCIENCE" keyword.
pub const PATHWAY_RULES: &[(&[&str], Pathway)] = &[
    (
        &["SPANISH", "CHINESE", "FRENCH", "JAPANESE", "GERMAN", "MANDARIN"],
        Pathway::WorldLanguage,
    ),
    (
        &["MATH", "CALCULUS", "ALGEBRA", "GEOMETRY", "STATISTICS", "DATA SCIENCE"],
        Pathway::Mathematics,
    ),
    (
        &["BIOLOGY", "BIOMEDICAL", "LIVING EARTH"],
        Pathway::ScienceBiological,
    ),
    (&["CHEMISTRY", "PHYSICS"], Pathway::SciencePhysical),
    (&["SCIENCE", "ENVIRONMENTAL"], Pathway::ScienceGeneral),
    (
        &["HISTORY", "GOVERNMENT", "SOCIAL STUDIES", "ETHNIC STUDIES", "HUMANITIES"],
        Pathway::HistorySocialScience,
    ),
    (
        &["ENGLISH", "LITERATURE", "WRITING", "EXPOSITORY"],
        Pathway::English,
    ),
    (
        &["ART", "MUSIC", "DRAMA", "THEATRE", "DANCE", "VISUAL", "BAND", "CHOIR", "ORCHESTRA"],
        Pathway::VisualPerformingArts,
    ),
    (
        &["PE ", "PHYSICAL EDUCATION", "HEALTH", "FITNESS"],
        Pathway::PhysicalEducation,
    ),
    (
        &["COMPUTER", "PROGRAMMING", "ENGINEERING", "ROBOTICS", "PLTW"],
        Pathway::ComputerScienceEngineering,
    ),
    (
        &["BUSINESS", "MARKETING", "FINANCE", "CAREER"],
        Pathway::CareerTechnicalEducation,
    ),
];

pub const DEFAULT_PATHWAY: Pathway = Pathway::Elective;

pub fn classify(name: &str, description: &str) -> Pathway {
    let combined = format!("{} {}", name, description).to_uppercase();
    classify_with(PATHWAY_RULES, &combined)
}

/// Index of the first rule with a substring hit, if any.
pub fn first_hit(rules: &[(&[&str], Pathway)], combined_upper: &str) -> Option<usize> {
    rules
        .iter()
        .position(|(words, _)| contains_any(combined_upper, words))
}

fn classify_with(rules: &[(&[&str], Pathway)], combined_upper: &str) -> Pathway {
    first_hit(rules, combined_upper)
        .map(|i| rules[i].1.clone())
        .unwrap_or(DEFAULT_PATHWAY)
}

/// Rough graduation-requirement flag from the extraction pathway and name.
pub fn is_graduation_requirement(pathway: &Pathway, name: &str) -> bool {
    let upper = name.to_uppercase();
    match pathway {
        Pathway::English => {
            contains_any(&upper, &["HIGH SCHOOL ENGLISH 1-2", "HIGH SCHOOL ENGLISH 3-4"])
        }
        p if p.is_science() => upper.contains("BIOLOGY") && upper.contains("1-2"),
        Pathway::Mathematics | Pathway::Math => upper.contains("INTEGRATED"),
        Pathway::HistorySocialScience => contains_any(&upper, &["WORLD HISTORY", "US HISTORY"]),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_index(p: &Pathway) -> usize {
        PATHWAY_RULES.iter().position(|(_, t)| t == p).unwrap()
    }

    #[test]
    fn biology_is_checked_before_generic_science() {
        assert!(rule_index(&Pathway::ScienceBiological) < rule_index(&Pathway::ScienceGeneral));
        assert!(rule_index(&Pathway::SciencePhysical) < rule_index(&Pathway::ScienceGeneral));
        assert_eq!(classify("MARINE BIOLOGY", "A science course"), Pathway::ScienceBiological);
        assert_eq!(classify("EARTH SCIENCE", ""), Pathway::ScienceGeneral);
    }

    #[test]
    fn languages_win_over_everything_below() {
        assert_eq!(rule_index(&Pathway::WorldLanguage), 0);
        assert_eq!(
            classify("SPANISH FOR SCIENCE", "Vocabulary for history and math"),
            Pathway::WorldLanguage
        );
    }

    #[test]
    fn each_rule_fires_on_its_own_keyword() {
        for (i, (words, target)) in PATHWAY_RULES.iter().enumerate() {
            let hit = first_hit(PATHWAY_RULES, words[0]).unwrap();
            assert!(hit <= i, "{} shadowed below rule {}", words[0], hit);
            if hit == i {
                assert_eq!(&classify(words[0], ""), target);
            }
        }
    }

    #[test]
    fn no_hit_defaults_to_elective() {
        assert_eq!(classify("STUDY HALL", "Quiet time"), Pathway::Elective);
    }

    #[test]
    fn substring_semantics_are_kept() {
        // "PART" contains "ART"; the table is substring-based on purpose
        assert_eq!(classify("PARTY PLANNING", ""), Pathway::VisualPerformingArts);
    }

    #[test]
    fn graduation_flags() {
        assert!(is_graduation_requirement(&Pathway::English, "High School English 1-2"));
        assert!(!is_graduation_requirement(&Pathway::English, "Creative Writing"));
        assert!(is_graduation_requirement(&Pathway::ScienceBiological, "BIOLOGY 1-2"));
        assert!(is_graduation_requirement(&Pathway::Mathematics, "INTEGRATED MATH II"));
        assert!(is_graduation_requirement(&Pathway::HistorySocialScience, "US HISTORY 1-2"));
        assert!(!is_graduation_requirement(&Pathway::Elective, "US HISTORY 1-2"));
    }
}
