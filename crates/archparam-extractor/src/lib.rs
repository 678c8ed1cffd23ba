//! Archparam Extractor
//!
//! Turns specification text into structured architectural parameter records
//! by prompting an LLM and parsing its JSON reply.
//!
//! # Architecture
//!
//! ```text
//! Snippet → PromptBuilder → TextGenerator (with retry) → parser → ParameterRecords → writer → YAML
//! ```
//!
//! # Key Features
//!
//! - **Prompt construction**: fixed instructions, source label, verbatim snippet
//! - **Rate-limit handling**: bounded exponential backoff on 429-class failures
//! - **Defensive parsing**: strips code fences, skips malformed records
//! - **Per-snippet isolation**: backend and parse failures yield zero records
//! - **YAML output**: a `parameters` list written to a file
//!
//! # Example Usage
//!
//! ```
//! use archparam_extractor::{Extractor, ExtractorConfig, RecordingSleeper};
//! use archparam_llm::MockProvider;
//!
//! let llm = MockProvider::new(r#"[{
//!     "name": "cache_block_size",
//!     "description": "Cache block size",
//!     "type": "size",
//!     "constraints": "implementation-specific",
//!     "keywords": ["may", "implementation-specific"]
//! }]"#);
//!
//! let extractor = Extractor::new(llm, ExtractorConfig::default())
//!     .with_sleeper(RecordingSleeper::default());
//!
//! let records = extractor
//!     .extract("Caches may be implemented with any block size.", "Spec 1.1")
//!     .unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].source(), "Spec 1.1");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod retry;
mod writer;


pub use config::ExtractorConfig;
pub use error::{ExtractorError, WriteError};
pub use extractor::Extractor;
pub use parser::{normalize_response, parse_llm_response, ParsedBatch, RejectedRecord};
pub use prompt::{PromptBuilder, PARAMETER_KEYWORDS};
pub use retry::{RecordingSleeper, RetryOutcome, RetryPolicy, Sleeper, ThreadSleeper};
pub use writer::{render_parameters, write_parameters};
