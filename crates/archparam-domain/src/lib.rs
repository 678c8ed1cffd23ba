//! Archparam Domain Layer
//!
//! Core data model and trait interfaces for architectural parameter
//! extraction. Infrastructure (LLM backends, file output, the CLI) lives in
//! the other crates and depends on this one.
//!
//! ## Key Concepts
//!
//! - **Snippet**: a chunk of specification text submitted for extraction
//! - **Source label**: caller-supplied string naming the document section a snippet came from
//! - **Parameter Record**: one implementation-defined or optional parameter found in a snippet
//! - **Backend**: the external generative-text service behind [`traits::TextGenerator`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod generation;
pub mod parameter;
pub mod traits;

// Re-exports for convenience
pub use generation::GenerationParams;
pub use parameter::{ParameterRecord, RawParameter, RecordError};
pub use traits::{ParameterExtractor, TextGenerator};
