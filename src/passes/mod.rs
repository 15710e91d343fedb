//! Corrective passes over the persisted collection.
//!
//! Passes do not commute: later ones read the pathway values earlier ones
//! left behind. `fix-pathways` targets the extraction vocabulary, so it has
//! to run before `consolidate` collapses that vocabulary, and the Off-Roll
//! repair only makes sense after the Off-Roll add. `CANONICAL_ORDER` is the
//! order `run-all` uses and the one `order` prints.

pub mod consolidate;
pub mod duplicate_ids;
pub mod fix_pathways;
pub mod foreign_language;
pub mod link_pairs;
pub mod names;
pub mod off_roll;

use tracing::info;

use crate::check;
use crate::config::Settings;
use crate::error::Result;
use crate::model::CourseCollection;
use crate::report::{self, ChangeLog};
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassId {
    FixPathways,
    NormalizeNames,
    Consolidate,
    OffRollAdd,
    OffRollRepair,
    ForeignLanguageTerms,
    LinkPairs,
    DedupeIds,
}

impl PassId {
    pub const CANONICAL_ORDER: [PassId; 8] = [
        PassId::FixPathways,
        PassId::NormalizeNames,
        PassId::Consolidate,
        PassId::OffRollAdd,
        PassId::OffRollRepair,
        PassId::ForeignLanguageTerms,
        PassId::LinkPairs,
        PassId::DedupeIds,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassId::FixPathways => "fix-pathways",
            PassId::NormalizeNames => "normalize-names",
            PassId::Consolidate => "consolidate",
            PassId::OffRollAdd => "off-roll-add",
            PassId::OffRollRepair => "off-roll-repair",
            PassId::ForeignLanguageTerms => "foreign-language-terms",
            PassId::LinkPairs => "link-pairs",
            PassId::DedupeIds => "dedupe-ids",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            PassId::FixPathways => "targeted pathway fixes on extraction labels",
            PassId::NormalizeNames => "expand L/, ELL and ELD name prefixes",
            PassId::Consolidate => "keyword fixes, science split, legacy labels to canonical",
            PassId::OffRollAdd => "tutor, aide and assistant courses into Off-Roll",
            PassId::OffRollRepair => "named courses out of Off-Roll, sentinel record",
            PassId::ForeignLanguageTerms => "level-pair Foreign Language courses to semester",
            PassId::LinkPairs => "pair courses from \"linked w/\" notes",
            PassId::DedupeIds => "renumber duplicate course ids",
        }
    }

    /// Mutate the collection in memory. Every change goes to `log`.
    pub fn apply(self, collection: &mut CourseCollection, log: &mut ChangeLog) -> usize {
        match self {
            PassId::FixPathways => fix_pathways::rules().apply(&mut collection.courses, log),
            PassId::NormalizeNames => names::rules().apply(&mut collection.courses, log),
            PassId::Consolidate => consolidate::rules().apply(&mut collection.courses, log),
            PassId::OffRollAdd => off_roll::add_rules().apply(&mut collection.courses, log),
            PassId::OffRollRepair => off_roll::repair(collection, log),
            PassId::ForeignLanguageTerms => {
                foreign_language::rules().apply(&mut collection.courses, log)
            }
            PassId::LinkPairs => link_pairs::apply(collection, log),
            PassId::DedupeIds => duplicate_ids::apply(collection, log),
        }
    }
}

/// One pass as one transaction: load, mutate, store, report.
pub fn run_pass(settings: &Settings, pass: PassId) -> Result<usize> {
    let path = &settings.collection_path;
    println!("=== {} ({}) ===", pass.name(), pass.describe());
    let mut collection = store::load(path)?;
    println!("Loaded {} courses from {:?}\n", collection.courses.len(), path);

    let mut log = ChangeLog::new(pass.name());
    let changed = pass.apply(&mut collection, &mut log);
    store::store(path, &mut collection)?;
    info!(pass = pass.name(), changed, "pass stored");

    log.print_summary();
    report::print_tally(&collection.courses);
    check::print_warnings(&check::audit(&collection));
    Ok(changed)
}

/// Every pass in canonical order, each its own transaction.
pub fn run_all(settings: &Settings) -> Result<usize> {
    let run_id = report::new_run_id();
    let span = tracing::info_span!("run_all", run_id = %run_id);
    let _guard = span.enter();

    let mut total = 0;
    for pass in PassId::CANONICAL_ORDER {
        total += run_pass(settings, pass)?;
        println!();
    }
    info!(total, "all passes done");
    Ok(total)
}

pub fn print_order() {
    println!("Canonical pass order:");
    for (i, pass) in PassId::CANONICAL_ORDER.iter().enumerate() {
        println!("  {}. {:<24} {}", i + 1, pass.name(), pass.describe());
    }
}
