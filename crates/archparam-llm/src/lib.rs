//! Archparam LLM Provider Layer
//!
//! Text-generation backends implementing the `TextGenerator` trait from
//! `archparam-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted responses for testing
//! - `GeminiProvider`: Google Generative Language API integration
//!
//! # Examples
//!
//! ```
//! use archparam_llm::MockProvider;
//! use archparam_domain::{GenerationParams, TextGenerator};
//!
//! let provider = MockProvider::new("[]");
//! let result = provider.generate("test prompt", &GenerationParams::default()).unwrap();
//! assert_eq!(result, "[]");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use archparam_domain::{GenerationParams, TextGenerator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::{GeminiProvider, ModelInfo};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or transport error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Backend answered, but not with a usable payload
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded (HTTP 429 / RESOURCE_EXHAUSTED)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Non-success HTTP status other than a rate limit
    #[error("API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Model not available
    #[error("Model not available: {model}")]
    ModelNotAvailable {
        /// Requested model
        model: String,
        /// Raw response body
        body: String,
    },

    /// Provider could not be constructed
    #[error("Provider setup error: {0}")]
    Setup(String),
}

impl LlmError {
    /// Whether this failure is a transient rate-limit signal worth retrying
    ///
    /// Decided by the error class alone, never by message text.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            LlmError::RateLimited(_) => true,
            LlmError::Api { status, .. } => *status == 429,
            _ => false,
        }
    }

    /// Raw response text attached to this error, if the backend sent any
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            LlmError::Api { body, .. } => Some(body.as_str()),
            LlmError::ModelNotAvailable { body, .. } => Some(body.as_str()),
            LlmError::InvalidResponse(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

enum Scripted {
    Text(String),
    Error(LlmError),
}

/// Mock LLM provider for deterministic testing
///
/// Returns queued replies in order, then falls back to a fixed default reply.
/// No network calls are made. Clones share the queue and call log.
///
/// # Examples
///
/// ```
/// use archparam_llm::{LlmError, MockProvider};
/// use archparam_domain::{GenerationParams, TextGenerator};
///
/// let provider = MockProvider::new("default");
/// provider.push_error(LlmError::RateLimited("HTTP 429".into()));
/// provider.push_response("second");
///
/// let params = GenerationParams::default();
/// assert!(provider.generate("p", &params).unwrap_err().is_rate_limit());
/// assert_eq!(provider.generate("p", &params).unwrap(), "second");
/// assert_eq!(provider.generate("p", &params).unwrap(), "default");
/// assert_eq!(provider.call_count(), 3);
/// ```
#[derive(Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<(String, GenerationParams)>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful reply
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Text(response.into()));
    }

    /// Queue a failure
    pub fn push_error(&self, error: LlmError) {
        self.script.lock().unwrap().push_back(Scripted::Error(error));
    }

    /// Queue `count` rate-limit failures
    pub fn push_rate_limits(&self, count: usize) {
        for _ in 0..count {
            self.push_error(LlmError::RateLimited(
                "429 Resource has been exhausted".to_string(),
            ));
        }
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    /// Generation parameters of the most recent call
    pub fn last_params(&self) -> Option<GenerationParams> {
        self.calls.lock().unwrap().last().map(|(_, params)| *params)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("default_response", &self.default_response)
            .field("calls", &self.call_count())
            .finish()
    }
}

impl TextGenerator for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), *params));

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Error(error)) => Err(error),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
