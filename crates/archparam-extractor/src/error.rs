//! Error types for the Extractor

use archparam_llm::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The backend kept rate-limiting after the retry budget was spent
    #[error("Rate limit persisted after {attempts} attempts: {source}")]
    RateLimitExhausted {
        /// Total attempts made, including the first
        attempts: u32,
        /// The last rate-limit failure
        source: LlmError,
    },

    /// Reply text is not a JSON array of objects
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}

/// Errors writing the output document
#[derive(Error, Debug)]
pub enum WriteError {
    /// Could not create the output's parent directory
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Could not write the output file
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}
