//! Parameter records - the unit of output of an extraction run

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a parameter record cannot be constructed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The `name` field is empty or whitespace
    #[error("parameter name is empty")]
    EmptyName,

    /// The caller-supplied source label is empty or whitespace
    #[error("source label is empty")]
    EmptySource,

    /// The model-supplied object does not have the expected shape
    #[error("malformed parameter object: {0}")]
    Malformed(String),
}

/// A parameter object exactly as the model returns it
///
/// This is the unvalidated half of the parse-then-construct pattern: serde
/// checks field presence and types, [`ParameterRecord::from_raw`] checks the
/// record invariants. Any `source` key the model emits is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawParameter {
    /// Short identifier
    pub name: String,

    /// Free-text explanation
    pub description: String,

    /// Category label (e.g. "integer", "size")
    #[serde(rename = "type")]
    pub param_type: String,

    /// Limits or requirements, possibly empty
    pub constraints: String,

    /// Words in the text that signalled the parameter
    pub keywords: Vec<String>,
}

/// One architectural parameter found in a snippet
///
/// Records are immutable once constructed: fields are private and only
/// exposed through accessors. Every record has a non-empty name and source.
/// Duplicate names across records are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRecord {
    name: String,
    description: String,
    #[serde(rename = "type")]
    param_type: String,
    constraints: String,
    source: String,
    keywords: Vec<String>,
}

impl ParameterRecord {
    /// Create a new record, validating its invariants
    ///
    /// # Examples
    ///
    /// ```
    /// use archparam_domain::ParameterRecord;
    ///
    /// let record = ParameterRecord::new(
    ///     "cache_block_size",
    ///     "The size of a cache block",
    ///     "size",
    ///     "",
    ///     "Privileged Spec 19.3.1",
    ///     vec!["implementation-specific".to_string()],
    /// ).unwrap();
    /// assert_eq!(record.name(), "cache_block_size");
    ///
    /// assert!(ParameterRecord::new("", "", "", "", "src", vec![]).is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        param_type: impl Into<String>,
        constraints: impl Into<String>,
        source: impl Into<String>,
        keywords: Vec<String>,
    ) -> Result<Self, RecordError> {
        let name = name.into();
        let source = source.into();

        if name.trim().is_empty() {
            return Err(RecordError::EmptyName);
        }
        if source.trim().is_empty() {
            return Err(RecordError::EmptySource);
        }

        Ok(Self {
            name,
            description: description.into(),
            param_type: param_type.into(),
            constraints: constraints.into(),
            source,
            keywords,
        })
    }

    /// Build a record from a model-supplied object and the caller's source label
    ///
    /// The source label always comes from the caller, never from the model.
    pub fn from_raw(raw: RawParameter, source: impl Into<String>) -> Result<Self, RecordError> {
        Self::new(
            raw.name,
            raw.description,
            raw.param_type,
            raw.constraints,
            source,
            raw.keywords,
        )
    }

    /// Short identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text explanation
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category label
    pub fn param_type(&self) -> &str {
        &self.param_type
    }

    /// Limits or requirements (may be empty)
    pub fn constraints(&self) -> &str {
        &self.constraints
    }

    /// Label of the snippet this record was extracted from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Triggering keywords, in the order the model listed them
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}
