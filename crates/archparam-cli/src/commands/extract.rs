//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::driver::{self, RunSummary};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use archparam_extractor::Extractor;
use archparam_llm::GeminiProvider;
use tracing::info;

/// Execute the extract command.
///
/// `config` must already carry the global overrides (model, log file); the
/// command's own output path and snippet list are applied here.
pub fn execute_extract(
    args: ExtractArgs,
    mut config: Config,
    api_key: Option<String>,
    formatter: &Formatter,
) -> Result<RunSummary> {
    config.apply_overrides(None, args.output, None, args.snippets);
    config.validate()?;
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::MissingApiKey)?;

    let provider = GeminiProvider::new(api_key, &config.model)?;
    let extractor = Extractor::new(provider, config.extractor.clone());

    info!("Architectural Parameter Extraction");
    info!("{}", "=".repeat(50));
    info!("Using model: {}", extractor.model_name());

    let summary = driver::run(&extractor, &config.snippets, &config.output)?;

    println!("{}", formatter.format_summary(&summary)?);
    Ok(summary)
}
