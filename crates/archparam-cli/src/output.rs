//! Output formatting for the CLI.

use crate::driver::{RunSummary, SnippetOutcome};
use crate::error::Result;
use archparam_llm::ModelInfo;
use colored::*;

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON report
    Json,
    /// Total count only
    Quiet,
}

impl From<crate::cli::CliFormat> for OutputFormat {
    fn from(format: crate::cli::CliFormat) -> Self {
        match format {
            crate::cli::CliFormat::Text => OutputFormat::Text,
            crate::cli::CliFormat::Json => OutputFormat::Json,
            crate::cli::CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the report for a finished run.
    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Quiet => Ok(summary.total.to_string()),
            OutputFormat::Text => Ok(self.format_summary_text(summary)),
        }
    }

    fn format_summary_text(&self, summary: &RunSummary) -> String {
        let mut out = String::new();

        for snippet in &summary.snippets {
            out.push_str(&format!("{}\n", self.colorize(&snippet.source, "cyan")));
            match &snippet.outcome {
                SnippetOutcome::Extracted => {}
                SnippetOutcome::ReadFailed(e) => {
                    out.push_str(&format!("  {}\n", self.error(&format!("cannot read input: {}", e))));
                }
                SnippetOutcome::ExtractionFailed(e) => {
                    out.push_str(&format!("  {}\n", self.error(&format!("extraction failed: {}", e))));
                }
            }
            out.push_str(&format!("  Found {} parameters\n", snippet.count()));
            for name in &snippet.parameters {
                out.push_str(&format!("    - {}\n", name));
            }
            out.push('\n');
        }

        out.push_str(&self.success(&format!(
            "Total parameters extracted: {}",
            summary.total
        )));
        out.push('\n');
        out.push_str(&format!("Results saved to: {}", summary.output.display()));
        out
    }

    /// Format a model listing.
    pub fn format_models(&self, models: &[ModelInfo]) -> String {
        let mut out = String::from("Listing models:\n");
        for model in models {
            out.push_str(&format!("Model: {}\n", model.name));
            out.push_str(&format!(
                "Supported methods: {}\n",
                model.supported_generation_methods.join(", ")
            ));
            out.push_str(&format!("{}\n", "-".repeat(20)));
        }
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
