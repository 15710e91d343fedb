use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Runtime settings: optional `catalog.toml`, then `CATALOG_*` env vars.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source_path: PathBuf,
    pub collection_path: PathBuf,
    pub generated_for: String,
    pub schema_version: String,
    /// Below this many chunks the segmenter drops to the next fallback strategy.
    pub min_chunks: usize,
    pub min_chunk_len: usize,
    pub completion_url: String,
    pub completion_model: String,
    pub completion_api_key: Option<String>,
    pub completion_max_tokens: u32,
    pub assist_batch_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source_path: PathBuf::from("catalog.pdf"),
            collection_path: PathBuf::from("data/courses_complete.json"),
            generated_for: "High School Course Catalog".to_string(),
            schema_version: "2025-11-17.v1".to_string(),
            min_chunks: 2,
            min_chunk_len: 50,
            completion_url: "https://api.anthropic.com/v1/messages".to_string(),
            completion_model: "claude-sonnet-4-20250514".to_string(),
            completion_api_key: None,
            completion_max_tokens: 4000,
            assist_batch_size: 5,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("catalog").required(false))
            .add_source(Environment::with_prefix("CATALOG").try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }

    pub fn partial_path(&self) -> PathBuf {
        let mut name = self.collection_path.as_os_str().to_owned();
        name.push(".partial.json");
        PathBuf::from(name)
    }
}
