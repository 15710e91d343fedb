mod assist;
mod check;
mod config;
mod error;
mod ids;
mod model;
mod parser;
mod passes;
mod report;
mod rules;
mod source;
mod store;
mod utils;

use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Settings;
use crate::passes::PassId;

#[derive(Parser)]
#[command(
    name = "catalog_courses",
    about = "Course catalog extraction and corrective passes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment the source document and extract the course collection
    Extract,
    /// Extract through the text-completion service instead of the heuristics
    ExtractAssisted,
    /// Targeted pathway fixes (run before consolidate)
    FixPathways,
    /// Expand L/, ELL and ELD name prefixes
    NormalizeNames,
    /// Collapse pathways onto the canonical set
    Consolidate,
    /// Move tutor/aide/assistant courses into Off-Roll
    OffRollAdd,
    /// Move named courses out of Off-Roll and add the sentinel record
    OffRollRepair,
    /// Level-pair Foreign Language courses become semester courses
    ForeignLanguageTerms,
    /// Pair courses from "linked w/" notes
    LinkPairs,
    /// Renumber duplicate course ids
    DedupeIds,
    /// Every corrective pass in canonical order
    RunAll,
    /// Print the canonical pass order
    Order,
    /// Audit the stored collection without changing it
    Check,
}

impl Commands {
    fn pass(&self) -> Option<PassId> {
        match self {
            Commands::FixPathways => Some(PassId::FixPathways),
            Commands::NormalizeNames => Some(PassId::NormalizeNames),
            Commands::Consolidate => Some(PassId::Consolidate),
            Commands::OffRollAdd => Some(PassId::OffRollAdd),
            Commands::OffRollRepair => Some(PassId::OffRollRepair),
            Commands::ForeignLanguageTerms => Some(PassId::ForeignLanguageTerms),
            Commands::LinkPairs => Some(PassId::LinkPairs),
            Commands::DedupeIds => Some(PassId::DedupeIds),
            _ => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(collection = ?settings.collection_path, source = ?settings.source_path, "settings loaded");

    if let Some(pass) = cli.command.pass() {
        passes::run_pass(&settings, pass)?;
    } else {
        match cli.command {
            Commands::Extract => {
                let collection = parser::extract_job(&settings)?;
                report::print_tally(&collection.courses);
                check::print_warnings(&check::audit(&collection));
            }
            Commands::ExtractAssisted => {
                let collection = assist::extract_assisted_job(&settings)?;
                report::print_tally(&collection.courses);
                check::print_warnings(&check::audit(&collection));
            }
            Commands::RunAll => {
                let total = passes::run_all(&settings)?;
                println!("All passes done: {} change(s)", total);
            }
            Commands::Order => passes::print_order(),
            Commands::Check => {
                let collection = store::load(&settings.collection_path)?;
                println!(
                    "{} courses in {:?}",
                    collection.courses.len(),
                    settings.collection_path
                );
                report::print_tally(&collection.courses);
                check::print_warnings(&check::audit(&collection));
            }
            _ => {}
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}
