//! Sampling parameters sent to the text-generation backend

use serde::{Deserialize, Serialize};

/// Generation parameters for a single backend call
///
/// The defaults bias toward low variance: a low temperature and bounded
/// nucleus/top-k sampling reduce fabricated content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling threshold
    pub top_p: f32,

    /// Top-k sampling bound
    pub top_k: u32,

    /// Cap on generated tokens
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

impl GenerationParams {
    /// Check that every value is in the range the backend accepts
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(format!("top_p {} out of range (0.0, 1.0]", self.top_p));
        }
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        Ok(())
    }
}
