//! Alternate extraction path: chunks are sent in batches to a text-completion
//! service that answers with course records as JSON.
//!
//! A failed batch is logged, everything accepted so far is written to the
//! partial side file, and the next batch runs. Nothing is retried.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{anyhow, Context};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{CatalogError, Result};
use crate::ids::IdentifierAllocator;
use crate::model::{CourseCollection, CourseRecord};
use crate::parser::segment::{Chunk, Segmenter};
use crate::report;
use crate::source::SourceDocument;
use crate::store;

pub const SEPARATOR: &str = "\n\n---COURSE SEPARATOR---\n\n";

const ANTHROPIC_VERSION: &str = "2023-06-01";

const SCHEMA: &str = r#"{
  "course_id": "string",
  "full_name": "string",
  "course_numbers": ["string"],
  "grades_allowed": [9,10,11,12],
  "credits": 10,
  "credit_type": "standard",
  "uc_csu_category": "A-G or null",
  "pathway": "string",
  "term_length": "yearlong or semester or quarter",
  "offered_terms": ["fall","spring"],
  "prerequisites_required": ["string"],
  "prerequisites_recommended": ["string"],
  "is_replacement_course": false,
  "replacement_equivalents": ["course_id"],
  "is_ap_or_honors_pair": false,
  "pair_course_id": "course_id or null",
  "fall_to_spring_dependency": false,
  "linked_courses": ["course_id"],
  "category_priority": 1,
  "is_graduation_requirement": false,
  "semester_restrictions": "fall only / spring only / null",
  "alternate_ids": ["string"],
  "notes": "string"
}"#;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```(?:json)?\n?").unwrap());

/// Anything that turns a prompt into completion text.
pub trait CompletionClient {
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

pub struct HttpCompletionClient {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl HttpCompletionClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings
            .completion_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("CATALOG_COMPLETION_API_KEY is not set"))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .context("failed to build HTTP client")?;
        Ok(HttpCompletionClient {
            client,
            url: settings.completion_url.clone(),
            model: settings.completion_model.clone(),
            api_key,
            max_tokens: settings.completion_max_tokens,
        })
    }
}

impl CompletionClient for HttpCompletionClient {
    fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };
        let response: MessagesResponse = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        response
            .content
            .into_iter()
            .find_map(|b| b.text)
            .ok_or_else(|| anyhow!("completion response has no text block"))
    }
}

pub fn build_prompt(batch_text: &str) -> String {
    format!(
        "Parse the following course catalog text into JSON array matching this exact schema:\n\n\
         {}\n\nCourse text:\n{}\n\nReturn ONLY a JSON array, no explanation.",
        SCHEMA, batch_text
    )
}

pub fn strip_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_string()
}

pub fn parse_response(batch: usize, response: &str) -> Result<Vec<CourseRecord>> {
    serde_json::from_str(&strip_fences(response)).map_err(|e| CatalogError::SchemaMismatch {
        batch,
        reason: e.to_string(),
    })
}

fn run_batch(batch: usize, chunks: &[Chunk], client: &dyn CompletionClient) -> Result<Vec<CourseRecord>> {
    let text = chunks
        .iter()
        .map(|c| c.text.trim())
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let response = client
        .complete(&build_prompt(&text))
        .map_err(|e| CatalogError::ChunkExtractionFailure {
            batch,
            reason: format!("{:#}", e),
        })?;
    parse_response(batch, &response)
}

#[derive(Debug, Default)]
pub struct AssistOutcome {
    pub courses: Vec<CourseRecord>,
    pub failed_batches: Vec<usize>,
}

/// Batches are numbered from 1 in log lines and errors.
pub fn extract_batches(
    chunks: &[Chunk],
    client: &dyn CompletionClient,
    batch_size: usize,
    partial_path: &Path,
) -> Result<AssistOutcome> {
    let batch_size = batch_size.max(1);
    let batches: Vec<&[Chunk]> = chunks.chunks(batch_size).collect();
    let pb = report::progress_bar(batches.len());
    let mut outcome = AssistOutcome::default();

    for (i, batch) in batches.into_iter().enumerate() {
        let number = i + 1;
        match run_batch(number, batch, client) {
            Ok(records) => {
                info!(batch = number, records = records.len(), "batch parsed");
                outcome.courses.extend(records);
            }
            Err(e) if e.is_batch_local() => {
                warn!(batch = number, error = %e, "batch failed, continuing");
                pb.println(format!("Error processing batch {}: {}", number, e));
                store::store_partial(partial_path, &outcome.courses)?;
                outcome.failed_batches.push(number);
            }
            Err(e) => return Err(e),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    unique_ids(&mut outcome.courses);
    Ok(outcome)
}

/// Service-made ids are kept when free; blanks and repeats get allocated ones.
fn unique_ids(courses: &mut [CourseRecord]) {
    let mut ids = IdentifierAllocator::new();
    for c in courses.iter_mut() {
        let id = c.id.trim().to_string();
        if !id.is_empty() && ids.reserve(&id) {
            continue;
        }
        let number = c.course_numbers.first().cloned().unwrap_or_default();
        let fresh = ids.allocate(&c.name, &number);
        warn!(from = %c.id, to = %fresh, "reassigned service course id");
        c.id = fresh;
    }
}

pub fn extract_assisted_with(settings: &Settings, client: &dyn CompletionClient) -> Result<CourseCollection> {
    let text = SourceDocument::from_path(&settings.source_path).read_text()?;
    let seg = Segmenter::new(settings.min_chunks, settings.min_chunk_len).segment(&text);
    if seg.chunks.is_empty() {
        return Err(CatalogError::NoChunks {
            chars: text.chars().count(),
        });
    }
    println!(
        "Sending {} chunks in batches of {}...",
        seg.chunks.len(),
        settings.assist_batch_size
    );

    let outcome = extract_batches(&seg.chunks, client, settings.assist_batch_size, &settings.partial_path())?;
    if outcome.courses.is_empty() {
        return Err(CatalogError::NoCourses {
            chunks: seg.chunks.len(),
        });
    }

    let mut collection = CourseCollection::new(&settings.generated_for, &settings.schema_version, outcome.courses);
    store::store(&settings.collection_path, &mut collection)?;
    println!(
        "Saved {} courses to {:?}",
        collection.courses.len(),
        settings.collection_path
    );
    if !outcome.failed_batches.is_empty() {
        println!(
            "{} batch(es) failed: {:?}; partial results in {:?}",
            outcome.failed_batches.len(),
            outcome.failed_batches,
            settings.partial_path()
        );
    }
    Ok(collection)
}

pub fn extract_assisted_job(settings: &Settings) -> anyhow::Result<CourseCollection> {
    let client = HttpCompletionClient::from_settings(settings)?;
    Ok(extract_assisted_with(settings, &client)?)
}
