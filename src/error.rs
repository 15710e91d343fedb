use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Document missing or empty. Nothing has been extracted yet.
    #[error("source unavailable: {path:?} ({reason})")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// No chunk survived segmentation, fallbacks included: almost certainly the wrong document.
    #[error("no course chunks found in source text ({chars} chars); check the document")]
    NoChunks { chars: usize },

    #[error("{chunks} chunks found but no course survived extraction")]
    NoCourses { chunks: usize },

    #[error("batch {batch}: completion call failed: {reason}")]
    ChunkExtractionFailure { batch: usize, reason: String },

    #[error("batch {batch}: response is not a course array: {reason}")]
    SchemaMismatch { batch: usize, reason: String },

    #[error("i/o on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CatalogError::Json {
            path: path.into(),
            source,
        }
    }

    /// Per-batch failures are logged and skipped; everything else aborts the job.
    pub fn is_batch_local(&self) -> bool {
        matches!(
            self,
            CatalogError::ChunkExtractionFailure { .. } | CatalogError::SchemaMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
