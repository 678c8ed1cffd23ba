//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{GenerationParams, ParameterRecord};

/// Trait for text-generation backends
///
/// Implemented by the infrastructure layer (archparam-llm). Calls block until
/// the backend answers.
pub trait TextGenerator {
    /// Error type for backend operations
    type Error;

    /// Generate a completion for `prompt`
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, Self::Error>;

    /// Identifier of the model behind this backend
    fn model_name(&self) -> &str;
}

/// Trait for extracting parameter records from a snippet
///
/// Implemented by the application layer (archparam-extractor)
pub trait ParameterExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract parameters from `snippet`, tagging each with `source`
    fn extract(&self, snippet: &str, source: &str) -> Result<Vec<ParameterRecord>, Self::Error>;
}
