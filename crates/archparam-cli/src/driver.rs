//! Runs extraction over every configured snippet and writes one output file.

use crate::config::SnippetSpec;
use crate::error::Result;
use archparam_domain::{ParameterExtractor, ParameterRecord};
use archparam_extractor::write_parameters;
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// What happened to one snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum SnippetOutcome {
    /// Extraction ran; zero records is still a success
    Extracted,
    /// The input file could not be read
    ReadFailed(String),
    /// Extraction returned an error
    ExtractionFailed(String),
}

/// Per-snippet result.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetReport {
    /// Source label
    pub source: String,
    /// Input file
    pub file: PathBuf,
    /// Names of the extracted records, in order
    pub parameters: Vec<String>,
    /// Outcome
    pub outcome: SnippetOutcome,
}

impl SnippetReport {
    /// Number of records this snippet produced.
    pub fn count(&self) -> usize {
        self.parameters.len()
    }
}

/// Result of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// One entry per configured snippet, in order
    pub snippets: Vec<SnippetReport>,
    /// Records written
    pub total: usize,
    /// Where they were written
    pub output: PathBuf,
}

/// Extract from each snippet in order, then write all records to `output`.
///
/// Failures reading or extracting a snippet are logged and leave that snippet
/// with zero records. Only the final write can fail the run.
pub fn run<E>(extractor: &E, snippets: &[SnippetSpec], output: &Path) -> Result<RunSummary>
where
    E: ParameterExtractor,
    E::Error: Display,
{
    let mut all_parameters: Vec<ParameterRecord> = Vec::new();
    let mut reports = Vec::with_capacity(snippets.len());

    for snippet in snippets {
        info!("Processing: {}", snippet.source);

        let (records, outcome) = match fs::read_to_string(&snippet.file) {
            Err(e) => {
                error!(
                    source = %snippet.source,
                    "Cannot read {}: {}",
                    snippet.file.display(),
                    e
                );
                (Vec::new(), SnippetOutcome::ReadFailed(e.to_string()))
            }
            Ok(text) => match extractor.extract(&text, &snippet.source) {
                Ok(records) => (records, SnippetOutcome::Extracted),
                Err(e) => {
                    error!(source = %snippet.source, "Extraction failed: {}", e);
                    (Vec::new(), SnippetOutcome::ExtractionFailed(e.to_string()))
                }
            },
        };

        info!("  Found {} parameters", records.len());
        reports.push(SnippetReport {
            source: snippet.source.clone(),
            file: snippet.file.clone(),
            parameters: records.iter().map(|r| r.name().to_string()).collect(),
            outcome,
        });
        all_parameters.extend(records);
    }

    let total = write_parameters(&all_parameters, output)?;
    info!("Total parameters extracted: {}", total);

    Ok(RunSummary {
        snippets: reports,
        total,
        output: output.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Returns canned names per source and records call order.
    struct StubExtractor {
        replies: HashMap<String, std::result::Result<Vec<&'static str>, String>>,
        calls: RefCell<Vec<String>>,
    }

    impl StubExtractor {
        fn new() -> Self {
            Self {
                replies: HashMap::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn reply(mut self, source: &str, names: Vec<&'static str>) -> Self {
            self.replies.insert(source.to_string(), Ok(names));
            self
        }

        fn fail(mut self, source: &str, message: &str) -> Self {
            self.replies.insert(source.to_string(), Err(message.to_string()));
            self
        }
    }

    impl ParameterExtractor for StubExtractor {
        type Error = String;

        fn extract(&self, snippet: &str, source: &str) -> std::result::Result<Vec<ParameterRecord>, String> {
            self.calls.borrow_mut().push(format!("{}:{}", source, snippet));
            match self.replies.get(source) {
                Some(Ok(names)) => Ok(names
                    .iter()
                    .map(|name| ParameterRecord::new(*name, "", "size", "", source, vec![]).unwrap())
                    .collect()),
                Some(Err(message)) => Err(message.clone()),
                None => Ok(Vec::new()),
            }
        }
    }

    fn write_input(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_runs_snippets_in_order_and_aggregates() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(dir.path(), "a.txt", "alpha");
        let b = write_input(dir.path(), "b.txt", "beta");
        let output = dir.path().join("output").join("parameters.yaml");

        let extractor = StubExtractor::new()
            .reply("A", vec!["a1", "a2"])
            .reply("B", vec!["b1"]);
        let snippets = vec![SnippetSpec::new(&a, "A"), SnippetSpec::new(&b, "B")];

        let summary = run(&extractor, &snippets, &output).unwrap();

        assert_eq!(*extractor.calls.borrow(), vec!["A:alpha", "B:beta"]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.snippets[0].parameters, vec!["a1", "a2"]);
        assert_eq!(summary.snippets[1].count(), 1);

        let written = fs::read_to_string(&output).unwrap();
        let a1 = written.find("name: a1").unwrap();
        let a2 = written.find("name: a2").unwrap();
        let b1 = written.find("name: b1").unwrap();
        assert!(a1 < a2 && a2 < b1);
    }

    #[test]
    fn test_failed_snippet_does_not_stop_run() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(dir.path(), "a.txt", "alpha");
        let b = write_input(dir.path(), "b.txt", "beta");
        let output = dir.path().join("parameters.yaml");

        let extractor = StubExtractor::new()
            .fail("A", "rate limit persisted")
            .reply("B", vec!["b1"]);
        let snippets = vec![SnippetSpec::new(&a, "A"), SnippetSpec::new(&b, "B")];

        let summary = run(&extractor, &snippets, &output).unwrap();

        assert_eq!(
            summary.snippets[0].outcome,
            SnippetOutcome::ExtractionFailed("rate limit persisted".to_string())
        );
        assert_eq!(summary.snippets[0].count(), 0);
        assert_eq!(summary.total, 1);
    }

    #[test]
    fn test_missing_input_file_yields_zero_records() {
        let dir = tempfile::tempdir().unwrap();
        let b = write_input(dir.path(), "b.txt", "beta");
        let output = dir.path().join("parameters.yaml");

        let extractor = StubExtractor::new().reply("B", vec!["b1"]);
        let snippets = vec![
            SnippetSpec::new(dir.path().join("missing.txt"), "A"),
            SnippetSpec::new(&b, "B"),
        ];

        let summary = run(&extractor, &snippets, &output).unwrap();

        assert!(matches!(summary.snippets[0].outcome, SnippetOutcome::ReadFailed(_)));
        assert_eq!(*extractor.calls.borrow(), vec!["B:beta"]);
        assert_eq!(summary.total, 1);
    }

    #[test]
    fn test_output_write_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(dir.path(), "a.txt", "alpha");
        let blocker = write_input(dir.path(), "blocker", "");

        let extractor = StubExtractor::new().reply("A", vec!["a1"]);
        let snippets = vec![SnippetSpec::new(&a, "A")];

        let result = run(&extractor, &snippets, &blocker.join("parameters.yaml"));
        assert!(matches!(result, Err(CliError::Write(_))));
    }

    #[test]
    fn test_all_empty_still_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_input(dir.path(), "a.txt", "");
        let output = dir.path().join("parameters.yaml");

        let summary = run(&StubExtractor::new(), &[SnippetSpec::new(&a, "A")], &output).unwrap();

        assert_eq!(summary.total, 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "parameters: []\n");
    }
}
