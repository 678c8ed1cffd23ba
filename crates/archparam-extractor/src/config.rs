//! Configuration for the Extractor

use crate::error::ExtractorError;
use crate::retry::RetryPolicy;
use archparam_domain::GenerationParams;
use serde::{Deserialize, Serialize};

/// Configuration for the Extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Sampling parameters sent with every backend call
    pub generation: GenerationParams,

    /// Backoff policy for rate-limited calls
    pub retry: RetryPolicy,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        self.generation.validate().map_err(ExtractorError::Config)?;
        self.retry.validate().map_err(ExtractorError::Config)?;
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay_secs, 5);
        assert_eq!(config.retry.multiplier, 2);
    }

    #[test]
    fn test_invalid_generation_rejected() {
        let mut config = ExtractorConfig::default();
        config.generation.top_k = 0;
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ExtractorConfig::from_toml(
            r#"
            [generation]
            temperature = 0.0

            [retry]
            max_retries = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.generation.temperature, 0.0);
        assert_eq!(config.generation.top_k, 40);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay_secs, 5);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_bad_toml() {
        let result = ExtractorConfig::from_toml("generation = 3");
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
