//! Gemini Provider Implementation
//!
//! Talks to Google's Generative Language REST API (`generateContent` and
//! model listing).
//!
//! The provider owns a single-threaded tokio runtime and blocks on it, so it
//! can be used from synchronous code through the `TextGenerator` trait. Do not
//! call the blocking methods from inside another tokio runtime.
//!
//! # Examples
//!
//! ```no_run
//! use archparam_llm::GeminiProvider;
//! use archparam_domain::{GenerationParams, TextGenerator};
//!
//! let provider = GeminiProvider::new("api-key", "gemini-2.0-flash-lite-001").unwrap();
//! let text = provider.generate("Say hello", &GenerationParams::default()).unwrap();
//! println!("{}", text);
//! ```

use crate::LlmError;
use archparam_domain::{GenerationParams, TextGenerator};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Generative Language API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default lightweight model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite-001";

/// API version path segment
const API_VERSION: &str = "v1beta";

/// Gemini API provider
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

/// A model advertised by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. `models/gemini-2.0-flash-lite-001`
    pub name: String,

    /// Human-readable name
    #[serde(default)]
    pub display_name: Option<String>,

    /// API methods the model supports, e.g. `generateContent`
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: RequestGenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl From<&GenerationParams> for RequestGenerationConfig {
    fn from(params: &GenerationParams) -> Self {
        Self {
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// A leading `models/` on the model name is accepted and stripped.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Setup(format!("Failed to build HTTP client: {}", e)))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Setup(format!("Failed to start runtime: {}", e)))?;

        let model = model.into();
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model,
            client,
            runtime,
        })
    }

    /// Point the provider at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Generate text with the configured model
    ///
    /// # Errors
    ///
    /// - `RateLimited` on HTTP 429
    /// - `ModelNotAvailable` on HTTP 404, carrying the raw body
    /// - `Api` for any other non-success status, carrying the raw body
    /// - `Communication` if the request never completes
    /// - `InvalidResponse` if the reply has no text candidate
    pub async fn generate_async(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, API_VERSION, self.model
        );

        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: params.into(),
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited(format!("HTTP 429: {}", body)));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable {
                model: self.model.clone(),
                body,
            });
        }
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        extract_text(&body)
    }

    /// List the models visible to this API key, following pagination
    pub async fn list_models_async(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let url = format!("{}/{}/models", self.base_url, API_VERSION);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimited(format!("HTTP 429: {}", body)));
            }
            if !status.is_success() {
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    body,
                });
            }

            let page: ListModelsResponse = serde_json::from_str(&body).map_err(|e| {
                LlmError::InvalidResponse(format!("Failed to parse model list: {}: {}", e, body))
            })?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }

    /// Blocking wrapper around [`GeminiProvider::list_models_async`]
    pub fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        self.runtime.block_on(self.list_models_async())
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(body: &str) -> Result<String, LlmError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}: {}", e, body)))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::InvalidResponse(format!(
            "Response has no text candidate: {}",
            body
        )));
    }

    Ok(text)
}

impl TextGenerator for GeminiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, Self::Error> {
        self.runtime.block_on(self.generate_async(prompt, params))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
