//! Run configuration for the CLI.

use crate::error::{CliError, Result};
use archparam_extractor::ExtractorConfig;
use archparam_llm::gemini::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "archparam.toml";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model identifier
    pub model: String,

    /// Output YAML path
    pub output: PathBuf,

    /// Log file path
    pub log_file: PathBuf,

    /// Snippets to process, in order
    pub snippets: Vec<SnippetSpec>,

    /// Sampling and retry settings
    pub extractor: ExtractorConfig,
}

/// One input file and the source label its records get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetSpec {
    /// Text file to read
    pub file: PathBuf,

    /// Source label attached to every record
    pub source: String,
}

impl SnippetSpec {
    /// Create a snippet spec.
    pub fn new(file: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
        }
    }
}

impl FromStr for SnippetSpec {
    type Err = String;

    /// Parse `FILE=SOURCE`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (file, source) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FILE=SOURCE, got '{}'", s))?;
        if file.trim().is_empty() {
            return Err("snippet file is empty".to_string());
        }
        if source.trim().is_empty() {
            return Err("snippet source is empty".to_string());
        }
        Ok(Self::new(file.trim(), source.trim()))
    }
}

impl fmt::Display for SnippetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.file.display(), self.source)
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `archparam.toml` is used if
    /// present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&contents)
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    let contents = fs::read_to_string(default_path)?;
                    Self::from_toml(&contents)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Check the configuration is runnable.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(CliError::Config("model must not be empty".into()));
        }
        if self.snippets.is_empty() {
            return Err(CliError::Config("no snippets configured".into()));
        }
        if let Some(bad) = self.snippets.iter().find(|s| s.source.trim().is_empty()) {
            return Err(CliError::Config(format!(
                "snippet {} has an empty source label",
                bad.file.display()
            )));
        }
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Apply command-line overrides.
    pub fn apply_overrides(
        &mut self,
        model: Option<String>,
        output: Option<PathBuf>,
        log_file: Option<PathBuf>,
        snippets: Vec<SnippetSpec>,
    ) {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(output) = output {
            self.output = output;
        }
        if let Some(log_file) = log_file {
            self.log_file = log_file;
        }
        if !snippets.is_empty() {
            self.snippets = snippets;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            output: PathBuf::from("output/parameters.yaml"),
            log_file: PathBuf::from("extraction.log"),
            snippets: vec![
                SnippetSpec::new("input/snippet1_caches.txt", "Privileged Spec 19.3.1"),
                SnippetSpec::new("input/snippet2_csr.txt", "Privileged Spec 2.1"),
            ],
            extractor: ExtractorConfig::default(),
        }
    }
}
