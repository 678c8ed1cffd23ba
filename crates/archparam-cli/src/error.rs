//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend setup or call error
    #[error("LLM error: {0}")]
    Llm(#[from] archparam_llm::LlmError),

    /// Output could not be written
    #[error("Output error: {0}")]
    Write(#[from] archparam_extractor::WriteError),

    /// No API credential in flags or environment
    #[error("No API key. Set GOOGLE_API_KEY or pass --api-key.")]
    MissingApiKey,

    /// Logging could not be initialised
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
