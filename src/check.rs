use std::fmt;

use itertools::Itertools;

use crate::model::{CourseCollection, CreditType, ALL_GRADES};
use crate::passes::off_roll::SENTINEL_ID;

/// A collection-level invariant that does not hold. Reported, never repaired here.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    DuplicateId { id: String, count: usize },
    NonCanonicalPathway { id: String, pathway: String },
    EmptyGrades { id: String },
    GradeOutOfRange { id: String, grade: u8 },
    RestrictionMismatch { id: String },
    NonPositiveCredits { id: String, credits: f64 },
    CreditTypeMismatch { id: String, credits: f64 },
}

impl InvariantViolation {
    pub fn kind(&self) -> &'static str {
        match self {
            InvariantViolation::DuplicateId { .. } => "duplicate id",
            InvariantViolation::NonCanonicalPathway { .. } => "non-canonical pathway",
            InvariantViolation::EmptyGrades { .. } => "empty grades",
            InvariantViolation::GradeOutOfRange { .. } => "grade outside 9-12",
            InvariantViolation::RestrictionMismatch { .. } => "restriction vs offered terms",
            InvariantViolation::NonPositiveCredits { .. } => "credits <= 0",
            InvariantViolation::CreditTypeMismatch { .. } => "credit type vs credits",
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::DuplicateId { id, count } => write!(f, "{} is used by {} courses", id, count),
            InvariantViolation::NonCanonicalPathway { id, pathway } => {
                write!(f, "{} has pathway \"{}\"", id, pathway)
            }
            InvariantViolation::EmptyGrades { id } => write!(f, "{} allows no grades", id),
            InvariantViolation::GradeOutOfRange { id, grade } => write!(f, "{} allows grade {}", id, grade),
            InvariantViolation::RestrictionMismatch { id } => {
                write!(f, "{} offered terms disagree with its semester restriction", id)
            }
            InvariantViolation::NonPositiveCredits { id, credits } => write!(f, "{} has {} credits", id, credits),
            InvariantViolation::CreditTypeMismatch { id, credits } => {
                write!(f, "{} credit type does not match {} credits", id, credits)
            }
        }
    }
}

pub fn audit(collection: &CourseCollection) -> Vec<InvariantViolation> {
    let mut out = Vec::new();

    for (id, count) in collection.courses.iter().map(|c| c.id.as_str()).counts().into_iter().sorted() {
        if count > 1 {
            out.push(InvariantViolation::DuplicateId { id: id.to_string(), count });
        }
    }

    for c in &collection.courses {
        if !c.pathway.is_canonical() {
            out.push(InvariantViolation::NonCanonicalPathway {
                id: c.id.clone(),
                pathway: c.pathway.to_string(),
            });
        }
        if c.grades.is_empty() {
            out.push(InvariantViolation::EmptyGrades { id: c.id.clone() });
        }
        for g in c.grades.iter().filter(|g| !ALL_GRADES.contains(g)) {
            out.push(InvariantViolation::GradeOutOfRange {
                id: c.id.clone(),
                grade: *g,
            });
        }
        if let Some(r) = c.semester_restriction {
            if c.offered_terms.len() != 1 || !c.offered_terms.contains(&r.term()) {
                out.push(InvariantViolation::RestrictionMismatch { id: c.id.clone() });
            }
        }
        // the sentinel stands for "no course" and carries no credit
        if c.id != SENTINEL_ID {
            if c.credits <= 0.0 {
                out.push(InvariantViolation::NonPositiveCredits {
                    id: c.id.clone(),
                    credits: c.credits,
                });
            }
            if c.credit_type != CreditType::for_credits(c.credits) {
                out.push(InvariantViolation::CreditTypeMismatch {
                    id: c.id.clone(),
                    credits: c.credits,
                });
            }
        }
    }
    out
}

const EXAMPLES_PER_KIND: usize = 5;

/// Grouped by kind, a few examples each.
pub fn print_warnings(violations: &[InvariantViolation]) {
    if violations.is_empty() {
        println!("\nNo invariant violations.");
        return;
    }
    println!("\n⚠ WARNING: {} invariant violation(s)", violations.len());
    let groups = violations.iter().into_group_map_by(|v| v.kind());
    for (kind, group) in groups.into_iter().sorted_by_key(|(kind, _)| *kind) {
        println!("  {} ({}):", kind, group.len());
        for v in group.iter().take(EXAMPLES_PER_KIND) {
            println!("    - {}", v);
        }
        if group.len() > EXAMPLES_PER_KIND {
            println!("    ... and {} more", group.len() - EXAMPLES_PER_KIND);
        }
    }
}
