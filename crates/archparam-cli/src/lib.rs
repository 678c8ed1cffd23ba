//! Archparam CLI library.
//!
//! Argument parsing, run configuration, logging setup, the extraction driver
//! and console reporting for the `archparam` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{Config, SnippetSpec};
pub use driver::{RunSummary, SnippetOutcome, SnippetReport};
pub use error::{CliError, Result};
pub use output::Formatter;
