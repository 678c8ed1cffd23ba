//! CLI command definitions and argument parsing.

use crate::config::SnippetSpec;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Archparam - Extract architectural parameters from specification text.
#[derive(Debug, Parser)]
#[command(name = "archparam")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format for the run report
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: archparam.toml if present)
    #[arg(short, long, global = true, env = "ARCHPARAM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model identifier
    #[arg(short, long, global = true, env = "ARCHPARAM_MODEL")]
    pub model: Option<String>,

    /// Backend API key
    #[arg(long, global = true, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Do not echo log lines to the console
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable report (default)
    Text,
    /// JSON report
    Json,
    /// Total count only
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract parameters from the configured snippets (default)
    Extract(ExtractArgs),

    /// List the models available to the API key
    Models(ModelsArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Default, Parser)]
pub struct ExtractArgs {
    /// Output YAML path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Snippet as FILE=SOURCE; repeat to replace the configured list
    #[arg(short, long = "snippet")]
    pub snippets: Vec<SnippetSpec>,
}

/// Arguments for the models command.
#[derive(Debug, Parser)]
pub struct ModelsArgs {
    /// Write the listing to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
