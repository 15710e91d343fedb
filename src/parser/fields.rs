use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::segment::Chunk;
use crate::model::{
    CreditType, SemesterRestriction, Term, TermLength, UcCsuCategory, ALL_GRADES,
};
use crate::utils::{truncate, truncate_with_ellipsis};

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{6}\b").unwrap());
static GRADE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(9|10|11|12)\b(?:\s*-\s*\b(9|10|11|12)\b)?").unwrap());
static GRADE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)grades?[\s:]+([0-9,\s-]+)").unwrap());
static CREDITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*credits?\b").unwrap());
static UC_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:UC/CSU|a-g)[\s:]+["']?([A-G]|None|N/A|Pending)\b"#).unwrap()
});
static PREREQ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(required|recommended)?\s*prerequisites?:[ \t]*([^\n]+)").unwrap()
});
static HEADER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{6}|grades?:|uc/csu:)").unwrap());

const PREREQ_MAX: usize = 200;
const NOTES_SOFT_MAX: usize = 300;
const NOTES_MAX: usize = 500;

/// Ordered term rules: explicit restrictions beat generic length words.
const TERM_RULES: &[(&[&str], TermLength, Option<SemesterRestriction>)] = &[
    (
        &["fall only", "offered fall"],
        TermLength::Semester,
        Some(SemesterRestriction::FallOnly),
    ),
    (
        &["spring only", "offered spring"],
        TermLength::Semester,
        Some(SemesterRestriction::SpringOnly),
    ),
    (&["semester"], TermLength::Semester, None),
    (&["quarter"], TermLength::Quarter, None),
];

/// Subject words used to guess an A-G letter when the chunk carries no marker.
const UC_INFERENCE: &[(&[&str], UcCsuCategory)] = &[
    (&["history", "social science", "government"], UcCsuCategory::A),
    (&["english"], UcCsuCategory::B),
    (&["math"], UcCsuCategory::C),
    (&["biology", "chemistry", "physics", "science"], UcCsuCategory::D),
    (&["spanish", "chinese", "french", "language"], UcCsuCategory::E),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CourseFields {
    pub name: String,
    pub numbers: Vec<String>,
    pub grades: BTreeSet<u8>,
    pub credits: f64,
    pub credit_type: CreditType,
    pub uc_csu: Option<UcCsuCategory>,
    pub term_length: TermLength,
    pub offered_terms: BTreeSet<Term>,
    pub restriction: Option<SemesterRestriction>,
    pub prereq_required: Vec<String>,
    pub prereq_recommended: Vec<String>,
    pub is_ap: bool,
    pub is_honors: bool,
    pub notes: String,
}

/// Derive every field for one chunk. `None` when no course name can be found.
pub fn extract(chunk: &Chunk) -> Option<CourseFields> {
    let header = chunk.header.as_ref();
    let name = match header {
        Some(h) => h.name.trim().to_string(),
        None => first_line(&chunk.text),
    };
    if name.is_empty() {
        return None;
    }

    let numbers = match header {
        Some(h) => course_numbers(&h.numbers),
        None => course_numbers(&chunk.text),
    };
    let grades = match header {
        Some(h) => parse_grades(&h.grades),
        None => GRADE_LABEL_RE
            .captures(&chunk.text)
            .map(|c| parse_grades(&c[1]))
            .unwrap_or_else(|| ALL_GRADES.into_iter().collect()),
    };
    let uc_csu = match header {
        Some(h) => UcMarker::parse(&h.uc_csu).category(),
        None => uc_from_text(&chunk.text),
    };

    let (term_length, restriction) = term_info(&chunk.text);
    let offered_terms = match restriction {
        Some(r) => [r.term()].into_iter().collect(),
        None => [Term::Fall, Term::Spring].into_iter().collect(),
    };
    let credits = credits(&chunk.text, &name, term_length);
    let (prereq_required, prereq_recommended) = prerequisites(&chunk.text);

    let upper = name.to_uppercase();
    Some(CourseFields {
        numbers,
        grades,
        credits,
        credit_type: CreditType::for_credits(credits),
        uc_csu,
        term_length,
        offered_terms,
        restriction,
        prereq_required,
        prereq_recommended,
        is_ap: upper.starts_with("AP "),
        is_honors: upper.contains("HONORS") || upper.contains("HONOUR"),
        notes: notes(&chunk.text),
        name,
    })
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn course_numbers(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in NUMBER_RE.find_iter(text) {
        if !out.iter().any(|n| n == m.as_str()) {
            out.push(m.as_str().to_string());
        }
    }
    out
}

/// Grade list such as "10, 11, 12" or "9-12"; all four grades when empty.
pub fn parse_grades(raw: &str) -> BTreeSet<u8> {
    let mut grades = BTreeSet::new();
    for caps in GRADE_TOKEN_RE.captures_iter(raw) {
        let lo: u8 = caps[1].parse().unwrap_or(9);
        let hi: u8 = caps
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(lo);
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        grades.extend(lo..=hi);
    }
    if grades.is_empty() {
        grades.extend(ALL_GRADES);
    }
    grades
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum UcMarker {
    Letter(UcCsuCategory),
    /// "None", "N/A" or "Pending": explicitly no category.
    NotApplicable,
}

impl UcMarker {
    fn parse(raw: &str) -> Self {
        UcCsuCategory::from_letter(raw)
            .map(UcMarker::Letter)
            .unwrap_or(UcMarker::NotApplicable)
    }

    fn category(self) -> Option<UcCsuCategory> {
        match self {
            UcMarker::Letter(c) => Some(c),
            UcMarker::NotApplicable => None,
        }
    }
}

fn uc_from_text(text: &str) -> Option<UcCsuCategory> {
    if let Some(caps) = UC_LABEL_RE.captures(text) {
        return UcMarker::parse(&caps[1]).category();
    }
    let lower = text.to_lowercase();
    UC_INFERENCE
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|(_, cat)| *cat)
}

/// First matching term rule wins; otherwise yearlong (a level pair such as
/// "1-2" in the name is read as a full-year sequence).
pub fn term_info(text: &str) -> (TermLength, Option<SemesterRestriction>) {
    let lower = text.to_lowercase();
    if let Some((_, length, restriction)) = TERM_RULES
        .iter()
        .find(|(phrases, _, _)| phrases.iter().any(|p| lower.contains(p)))
    {
        return (*length, *restriction);
    }
    // A level pair in the name ("1-2") and no evidence at all both land here.
    // Foreign Language overrides the level-pair case later (passes::foreign_language).
    (TermLength::Yearlong, None)
}

pub fn credits(text: &str, name: &str, term: TermLength) -> f64 {
    let explicit = CREDITS_RE
        .captures(text)
        .and_then(|c| c[1].parse::<f64>().ok())
        .filter(|v| *v > 0.0);
    if let Some(v) = explicit {
        return v;
    }
    if name.contains("4.5") || name.contains("2.5") {
        return 2.5;
    }
    match term {
        TermLength::Semester => 5.0,
        TermLength::Quarter => 2.5,
        TermLength::Yearlong => 10.0,
    }
}

pub fn prerequisites(text: &str) -> (Vec<String>, Vec<String>) {
    let mut required: Vec<String> = Vec::new();
    let mut recommended: Vec<String> = Vec::new();
    for caps in PREREQ_RE.captures_iter(text) {
        let body = caps[2].trim();
        let bare = body.trim_end_matches('.').trim();
        if bare.is_empty() || bare.eq_ignore_ascii_case("none") {
            continue;
        }
        let is_recommended = caps
            .get(1)
            .map(|l| l.as_str().eq_ignore_ascii_case("recommended"))
            .unwrap_or(false)
            || body.to_lowercase().contains("recommend");
        let target = if is_recommended {
            &mut recommended
        } else {
            &mut required
        };
        let entry = truncate(body, PREREQ_MAX);
        if !target.contains(&entry) {
            target.push(entry);
        }
    }
    (required, recommended)
}

/// Description text after the header, without marker lines.
pub fn notes(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut len = 0;
    for line in text.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() || HEADER_LINE_RE.is_match(line) {
            continue;
        }
        len += line.len() + 1;
        kept.push(line);
        if len > NOTES_SOFT_MAX {
            break;
        }
    }
    truncate_with_ellipsis(&kept.join(" "), NOTES_MAX)
}
