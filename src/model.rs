use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Curriculum category. Extraction emits the wider legacy vocabulary; the
/// corrective passes collapse it onto the canonical eleven.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Pathway {
    English,
    Math,
    HistorySocialScience,
    ScienceBiological,
    SciencePhysical,
    FineArts,
    ForeignLanguage,
    Cte,
    PhysicalEducation,
    Electives,
    OffRoll,
    // legacy extraction labels
    WorldLanguage,
    Mathematics,
    ScienceGeneral,
    Science,
    VisualPerformingArts,
    CareerTechnicalEducation,
    ComputerScienceEngineering,
    Elective,
    Other(String),
}

impl Pathway {
    pub const CANONICAL: [Pathway; 11] = [
        Pathway::English,
        Pathway::Math,
        Pathway::HistorySocialScience,
        Pathway::ScienceBiological,
        Pathway::SciencePhysical,
        Pathway::FineArts,
        Pathway::ForeignLanguage,
        Pathway::Cte,
        Pathway::PhysicalEducation,
        Pathway::Electives,
        Pathway::OffRoll,
    ];

    pub fn label(&self) -> &str {
        match self {
            Pathway::English => "English",
            Pathway::Math => "Math",
            Pathway::HistorySocialScience => "History/Social Science",
            Pathway::ScienceBiological => "Science - Biological",
            Pathway::SciencePhysical => "Science - Physical",
            Pathway::FineArts => "Fine Arts",
            Pathway::ForeignLanguage => "Foreign Language",
            Pathway::Cte => "CTE",
            Pathway::PhysicalEducation => "Physical Education",
            Pathway::Electives => "Electives",
            Pathway::OffRoll => "Off-Roll",
            Pathway::WorldLanguage => "World Language",
            Pathway::Mathematics => "Mathematics",
            Pathway::ScienceGeneral => "Science - General",
            Pathway::Science => "Science",
            Pathway::VisualPerformingArts => "Visual & Performing Arts",
            Pathway::CareerTechnicalEducation => "Career Technical Education",
            Pathway::ComputerScienceEngineering => "Computer Science & Engineering",
            Pathway::Elective => "Elective",
            Pathway::Other(s) => s,
        }
    }

    pub fn is_canonical(&self) -> bool {
        Self::CANONICAL.contains(self)
    }

    pub fn is_science(&self) -> bool {
        matches!(
            self,
            Pathway::Science
                | Pathway::ScienceGeneral
                | Pathway::ScienceBiological
                | Pathway::SciencePhysical
        )
    }
}

impl From<String> for Pathway {
    fn from(raw: String) -> Self {
        // catalogs mix hyphen and en dash in the science labels
        let norm = raw.trim().replace('–', "-");
        match norm.as_str() {
            "English" => Pathway::English,
            "Math" => Pathway::Math,
            "History/Social Science" => Pathway::HistorySocialScience,
            "Science - Biological" => Pathway::ScienceBiological,
            "Science - Physical" => Pathway::SciencePhysical,
            "Fine Arts" => Pathway::FineArts,
            "Foreign Language" => Pathway::ForeignLanguage,
            "CTE" => Pathway::Cte,
            "Physical Education" => Pathway::PhysicalEducation,
            "Electives" => Pathway::Electives,
            "Off-Roll" => Pathway::OffRoll,
            "World Language" => Pathway::WorldLanguage,
            "Mathematics" => Pathway::Mathematics,
            "Science - General" => Pathway::ScienceGeneral,
            "Science" => Pathway::Science,
            "Visual & Performing Arts" => Pathway::VisualPerformingArts,
            "Career Technical Education" => Pathway::CareerTechnicalEducation,
            "Computer Science & Engineering" => Pathway::ComputerScienceEngineering,
            "Elective" => Pathway::Elective,
            _ => Pathway::Other(raw),
        }
    }
}

impl From<&str> for Pathway {
    fn from(raw: &str) -> Self {
        Pathway::from(raw.to_string())
    }
}

impl From<Pathway> for String {
    fn from(p: Pathway) -> Self {
        p.label().to_string()
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermLength {
    Yearlong,
    Semester,
    Quarter,
}

impl fmt::Display for TermLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TermLength::Yearlong => "yearlong",
            TermLength::Semester => "semester",
            TermLength::Quarter => "quarter",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Fall,
    Spring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemesterRestriction {
    #[serde(rename = "fall only")]
    FallOnly,
    #[serde(rename = "spring only")]
    SpringOnly,
}

impl SemesterRestriction {
    pub fn term(self) -> Term {
        match self {
            SemesterRestriction::FallOnly => Term::Fall,
            SemesterRestriction::SpringOnly => Term::Spring,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditType {
    Standard,
    Partial,
}

impl CreditType {
    pub fn for_credits(credits: f64) -> Self {
        if credits >= 5.0 {
            CreditType::Standard
        } else {
            CreditType::Partial
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UcCsuCategory {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl UcCsuCategory {
    pub fn from_letter(s: &str) -> Option<Self> {
        match s.trim().trim_matches(|c| c == '"' || c == '\'').to_ascii_uppercase().as_str() {
            "A" => Some(UcCsuCategory::A),
            "B" => Some(UcCsuCategory::B),
            "C" => Some(UcCsuCategory::C),
            "D" => Some(UcCsuCategory::D),
            "E" => Some(UcCsuCategory::E),
            "F" => Some(UcCsuCategory::F),
            "G" => Some(UcCsuCategory::G),
            _ => None,
        }
    }
}

pub const ALL_GRADES: [u8; 4] = [9, 10, 11, 12];

fn default_priority() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(rename = "course_id", alias = "identifier")]
    pub id: String,
    #[serde(rename = "full_name", alias = "display_name")]
    pub name: String,
    #[serde(default)]
    pub course_numbers: Vec<String>,
    #[serde(rename = "grades_allowed", alias = "grade_levels")]
    pub grades: BTreeSet<u8>,
    #[serde(rename = "credits", alias = "credit_value")]
    pub credits: f64,
    pub credit_type: CreditType,
    #[serde(default)]
    pub uc_csu_category: Option<UcCsuCategory>,
    pub pathway: Pathway,
    pub term_length: TermLength,
    pub offered_terms: BTreeSet<Term>,
    #[serde(default)]
    pub prerequisites_required: Vec<String>,
    #[serde(default)]
    pub prerequisites_recommended: Vec<String>,
    #[serde(default)]
    pub is_replacement_course: bool,
    #[serde(default)]
    pub replacement_equivalents: Vec<String>,
    #[serde(default)]
    pub is_ap_or_honors_pair: bool,
    #[serde(default)]
    pub pair_course_id: Option<String>,
    #[serde(default)]
    pub fall_to_spring_dependency: bool,
    #[serde(default)]
    pub linked_courses: Vec<String>,
    #[serde(default = "default_priority")]
    pub category_priority: u32,
    #[serde(default)]
    pub is_graduation_requirement: bool,
    #[serde(rename = "semester_restrictions", alias = "semester_restriction", default)]
    pub semester_restriction: Option<SemesterRestriction>,
    #[serde(default)]
    pub alternate_ids: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl CourseRecord {
    /// A record with every optional field empty; extraction fills in the rest.
    pub fn blank(id: &str, name: &str, pathway: Pathway) -> Self {
        CourseRecord {
            id: id.to_string(),
            name: name.to_string(),
            course_numbers: Vec::new(),
            grades: ALL_GRADES.into_iter().collect(),
            credits: 10.0,
            credit_type: CreditType::Standard,
            uc_csu_category: None,
            pathway,
            term_length: TermLength::Yearlong,
            offered_terms: [Term::Fall, Term::Spring].into_iter().collect(),
            prerequisites_required: Vec::new(),
            prerequisites_recommended: Vec::new(),
            is_replacement_course: false,
            replacement_equivalents: Vec::new(),
            is_ap_or_honors_pair: false,
            pair_course_id: None,
            fall_to_spring_dependency: false,
            linked_courses: Vec::new(),
            category_priority: 1,
            is_graduation_requirement: false,
            semester_restriction: None,
            alternate_ids: Vec::new(),
            notes: String::new(),
        }
    }
}

/// The persisted snapshot: one file, loaded and stored whole by every job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseCollection {
    pub generated_for: String,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_courses: Option<usize>,
    pub courses: Vec<CourseRecord>,
}

impl CourseCollection {
    pub fn new(generated_for: &str, schema_version: &str, courses: Vec<CourseRecord>) -> Self {
        CourseCollection {
            generated_for: generated_for.to_string(),
            schema_version: schema_version.to_string(),
            total_courses: Some(courses.len()),
            courses,
        }
    }

    pub fn find(&self, id: &str) -> Option<&CourseRecord> {
        self.courses.iter().find(|c| c.id == id)
    }
}
