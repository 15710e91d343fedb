use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;

use crate::model::CourseRecord;

/// One field rewrite on one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub course_id: String,
    pub course_name: String,
    pub field: &'static str,
    pub before: String,
    pub after: String,
}

/// Per-pass change log. Lines are printed as they are recorded so the
/// operator can follow a long pass.
pub struct ChangeLog {
    pass_name: String,
    changes: Vec<Change>,
    quiet: bool,
}

impl ChangeLog {
    pub fn new(pass_name: &str) -> Self {
        ChangeLog {
            pass_name: pass_name.to_string(),
            changes: Vec::new(),
            quiet: false,
        }
    }

    /// Collects without printing.
    #[cfg(test)]
    pub fn quiet(pass_name: &str) -> Self {
        ChangeLog {
            quiet: true,
            ..ChangeLog::new(pass_name)
        }
    }

    pub fn record(&mut self, change: Change) {
        if !self.quiet {
            println!("  ✓ {} [{}]", change.course_name, change.course_id);
            println!("    {}: {} → {}", change.field, change.before, change.after);
        }
        self.changes.push(change);
    }

    pub fn note(&mut self, line: &str) {
        if !self.quiet {
            println!("  {}", line);
        }
    }

    pub fn pass_name(&self) -> &str {
        &self.pass_name
    }

    #[cfg(test)]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn print_summary(&self) {
        if self.is_empty() {
            println!("\n{}: nothing to change", self.pass_name());
        } else {
            println!("\n{}: {} change(s)", self.pass_name(), self.len());
        }
    }
}

/// Pathway membership counts, sorted by label.
pub fn tally(courses: &[CourseRecord]) -> Vec<(String, usize)> {
    courses
        .iter()
        .map(|c| c.pathway.label().to_string())
        .counts()
        .into_iter()
        .sorted()
        .collect()
}

pub fn print_tally(courses: &[CourseRecord]) {
    println!("\nPATHWAY DISTRIBUTION ({} courses):", courses.len());
    for (label, count) in tally(courses) {
        println!("  {:<28} {:>4}", label, count);
    }
}

pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

pub fn new_run_id() -> String {
    format!("run-{}", Utc::now().format("%Y%m%dT%H%M%SZ"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pathway;

    #[test]
    fn tally_is_sorted_by_label() {
        let courses = vec![
            CourseRecord::blank("A", "A", Pathway::Math),
            CourseRecord::blank("B", "B", Pathway::English),
            CourseRecord::blank("C", "C", Pathway::Math),
        ];
        assert_eq!(
            tally(&courses),
            vec![("English".to_string(), 1), ("Math".to_string(), 2)]
        );
    }

    #[test]
    fn quiet_log_still_collects() {
        let mut log = ChangeLog::quiet("t");
        assert!(log.is_empty());
        log.record(Change {
            course_id: "X".into(),
            course_name: "X".into(),
            field: "pathway",
            before: "Elective".into(),
            after: "Electives".into(),
        });
        assert_eq!(log.len(), 1);
        assert_eq!(log.changes()[0].after, "Electives");
    }

    #[test]
    fn run_id_has_prefix() {
        assert!(new_run_id().starts_with("run-"));
    }
}
