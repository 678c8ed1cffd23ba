//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use crate::retry::{RetryOutcome, Sleeper, ThreadSleeper};
use archparam_domain::{ParameterExtractor, ParameterRecord, TextGenerator};
use archparam_llm::LlmError;
use tracing::{debug, error, info, warn};

/// The Extractor turns one snippet into parameter records
///
/// Failures are isolated per snippet: backend errors other than rate limits
/// and unparseable replies produce an empty list. The only error returned is
/// [`ExtractorError::RateLimitExhausted`].
pub struct Extractor<G>
where
    G: TextGenerator<Error = LlmError>,
{
    generator: G,
    config: ExtractorConfig,
    sleeper: Box<dyn Sleeper>,
}

impl<G> Extractor<G>
where
    G: TextGenerator<Error = LlmError>,
{
    /// Create a new Extractor that sleeps the current thread between retries
    pub fn new(generator: G, config: ExtractorConfig) -> Self {
        Self {
            generator,
            config,
            sleeper: Box::new(ThreadSleeper),
        }
    }

    /// Replace the backoff sleeper
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Name of the model behind the backend
    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract parameters from `snippet`, tagging every record with `source`
    pub fn extract(&self, snippet: &str, source: &str) -> Result<Vec<ParameterRecord>, ExtractorError> {
        let prompt = PromptBuilder::new(snippet, source).build();

        info!(
            source,
            model = self.model_name(),
            snippet_len = snippet.len(),
            "Extracting parameters"
        );
        debug!("Prompt length: {} chars", prompt.len());

        let outcome = self.config.retry.run(
            self.sleeper.as_ref(),
            LlmError::is_rate_limit,
            |attempt| {
                debug!(source, attempt, "Calling backend");
                self.generator.generate(&prompt, &self.config.generation)
            },
        );

        let response = match outcome {
            RetryOutcome::Succeeded { value, retries } => {
                if retries > 0 {
                    info!(source, retries, "Backend call succeeded after retries");
                }
                value
            }
            RetryOutcome::Exhausted { attempts, error } => {
                error!(source, attempts, error = %error, "Rate limit retries exhausted");
                return Err(ExtractorError::RateLimitExhausted {
                    attempts,
                    source: error,
                });
            }
            RetryOutcome::Failed { error, .. } => {
                error!(source, "Error generating content: {}", error);
                if let Some(raw) = error.raw_response() {
                    error!(source, "Raw response: {}", raw);
                }
                return Ok(Vec::new());
            }
        };

        debug!("LLM response length: {} chars", response.len());

        let batch = match parse_llm_response(&response, source) {
            Ok(batch) => batch,
            Err(e) => {
                error!(source, "Error parsing JSON response: {}", e);
                error!(source, "Response text: {}", response);
                return Ok(Vec::new());
            }
        };

        for rejected in &batch.rejected {
            warn!(source, index = rejected.index, "Skipping parameter: {}", rejected.reason);
        }

        info!("Parsed {} parameters from {}", batch.records.len(), source);
        if batch.records.is_empty() {
            info!("Empty parameters. Raw response: {}", response);
        }

        Ok(batch.records)
    }
}

impl<G> ParameterExtractor for Extractor<G>
where
    G: TextGenerator<Error = LlmError>,
{
    type Error = ExtractorError;

    fn extract(&self, snippet: &str, source: &str) -> Result<Vec<ParameterRecord>, Self::Error> {
        Extractor::extract(self, snippet, source)
    }
}
