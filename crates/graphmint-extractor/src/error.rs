//! Error types for the extraction pipeline

use thiserror::Error;

/// Errors that can occur during an ingestion run
///
/// Only `InvalidConfiguration` is fatal to a whole run. The per-chunk
/// variants (`Extraction`, `Timeout`, `Parse`) are recoverable: the
/// pipeline logs them, skips that chunk's contribution, and keeps
/// going, so a run that loses chunks still produces a valid partial
/// graph.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Configuration is unusable; the caller must fix it before retrying
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// One chunk's extraction call failed terminally
    #[error("Extraction call failed: {0}")]
    Extraction(String),

    /// One chunk's extraction call exceeded the configured budget
    #[error("Extraction call timed out")]
    Timeout,

    /// One chunk's raw output contained no usable extraction JSON
    #[error("Unparseable extraction output: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::Parse(e.to_string())
    }
}
