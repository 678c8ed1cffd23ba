//! Tracing setup: a log file plus an optional console echo.

use crate::error::{CliError, Result};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events are logged at the chosen level; everything else at warn.
const OWN_TARGETS: [&str; 4] = [
    "archparam",
    "archparam_cli",
    "archparam_extractor",
    "archparam_llm",
];

/// Filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let mut directive = String::from("warn");
    for target in OWN_TARGETS {
        directive.push_str(&format!(",{}={}", target, level));
    }
    directive
}

/// Initialise logging for the binary.
///
/// The log file is truncated on every run. `RUST_LOG` overrides the default
/// filter. With `quiet`, nothing is echoed to stderr.
pub fn init_logging(log_file: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(log_file)?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    let console_layer = (!quiet).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
