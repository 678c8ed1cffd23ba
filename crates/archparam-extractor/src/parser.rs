//! Parse LLM output into parameter records

use crate::error::ExtractorError;
use archparam_domain::{ParameterRecord, RawParameter, RecordError};
use serde_json::Value;

/// Records parsed from one reply, plus the ones that were skipped
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    /// Valid records, in reply order
    pub records: Vec<ParameterRecord>,

    /// Array elements that could not become records
    pub rejected: Vec<RejectedRecord>,
}

/// An array element that failed record construction
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Position in the reply array
    pub index: usize,

    /// Why it was rejected
    pub reason: RecordError,
}

/// Parse an LLM reply into parameter records tagged with `source`
///
/// The reply must be a JSON array, optionally wrapped in a code fence. A
/// malformed element is skipped and reported in [`ParsedBatch::rejected`];
/// the rest of the array is still used.
pub fn parse_llm_response(response: &str, source: &str) -> Result<ParsedBatch, ExtractorError> {
    let json_str = normalize_response(response);

    let json: Value = serde_json::from_str(&json_str)?;

    let items = match json {
        Value::Array(items) => items,
        _ => {
            return Err(ExtractorError::InvalidFormat(
                "Expected JSON array".to_string(),
            ))
        }
    };

    let mut batch = ParsedBatch::default();
    for (index, item) in items.into_iter().enumerate() {
        match build_record(item, source) {
            Ok(record) => batch.records.push(record),
            Err(reason) => batch.rejected.push(RejectedRecord { index, reason }),
        }
    }

    Ok(batch)
}

fn build_record(item: Value, source: &str) -> Result<ParameterRecord, RecordError> {
    if !item.is_object() {
        return Err(RecordError::Malformed("element is not a JSON object".to_string()));
    }
    let raw: RawParameter =
        serde_json::from_value(item).map_err(|e| RecordError::Malformed(e.to_string()))?;
    ParameterRecord::from_raw(raw, source)
}

/// Strip a surrounding markdown code fence, whatever its language tag
///
/// The first line is dropped when it opens a fence, and the last line when
/// it is a bare closing fence. Unfenced text is returned trimmed.
pub fn normalize_response(response: &str) -> String {
    let trimmed = response.trim();

    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().skip(1).collect();
    if lines.last().map(|line| line.trim() == "```").unwrap_or(false) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_PARAMETER: &str = r#"[
        {
            "name": "cache_block_size",
            "description": "Cache block size",
            "type": "size",
            "constraints": "implementation-specific",
            "keywords": ["may", "implementation-specific"]
        }
    ]"#;

    #[test]
    fn test_parse_valid_json() {
        let batch = parse_llm_response(ONE_PARAMETER, "Spec 1.1").unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.records[0].name(), "cache_block_size");
        assert_eq!(batch.records[0].source(), "Spec 1.1");
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let fenced = format!("```json\n{}\n```", ONE_PARAMETER);
        let plain = parse_llm_response(ONE_PARAMETER, "s").unwrap();
        let unfenced = parse_llm_response(&fenced, "s").unwrap();
        assert_eq!(plain.records, unfenced.records);
    }

    #[test]
    fn test_parse_empty_array() {
        let batch = parse_llm_response("[]", "s").unwrap();
        assert!(batch.records.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_llm_response("This is not JSON", "s");
        assert!(matches!(result, Err(ExtractorError::JsonParse(_))));
    }

    #[test]
    fn test_parse_json_not_array() {
        let result = parse_llm_response(r#"{"name": "x"}"#, "s");
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_partial_success() {
        let response = r#"[
            {"name": "a", "description": "", "type": "integer", "constraints": "", "keywords": []},
            {"name": "b", "description": "missing type"},
            "not an object",
            {"name": "", "description": "", "type": "t", "constraints": "", "keywords": []},
            {"name": "c", "description": "", "type": "boolean", "constraints": "", "keywords": ["optional"]}
        ]"#;

        let batch = parse_llm_response(response, "s").unwrap();
        let names: Vec<_> = batch.records.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["a", "c"]);

        let rejected: Vec<_> = batch.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![1, 2, 3]);
        assert_eq!(batch.rejected[2].reason, RecordError::EmptyName);
        assert!(matches!(batch.rejected[0].reason, RecordError::Malformed(_)));
    }

    #[test]
    fn test_keywords_must_be_strings() {
        let response = r#"[{"name": "a", "description": "", "type": "t", "constraints": "", "keywords": [1, 2]}]"#;
        let batch = parse_llm_response(response, "s").unwrap();
        assert!(batch.records.is_empty());
        assert_eq!(batch.rejected.len(), 1);
    }

    #[test]
    fn test_normalize_plain_json() {
        assert_eq!(normalize_response("  [1, 2]\n"), "[1, 2]");
    }

    #[test]
    fn test_normalize_fence_with_language_tag() {
        assert_eq!(normalize_response("```json\n[1]\n```"), "[1]");
        assert_eq!(normalize_response("```JSON5\n[1]\n```\n"), "[1]");
    }

    #[test]
    fn test_normalize_fence_without_language() {
        assert_eq!(normalize_response("```\n[1,\n2]\n```"), "[1,\n2]");
    }

    #[test]
    fn test_normalize_unclosed_fence() {
        assert_eq!(normalize_response("```json\n[1]"), "[1]");
    }
}
