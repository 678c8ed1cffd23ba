//! Models command implementation.

use crate::cli::ModelsArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use archparam_llm::GeminiProvider;
use std::fs;
use tracing::error;

/// Execute the models command.
///
/// When writing to a file, a listing failure is recorded in the file as
/// `FULL ERROR: ...` instead of failing the command.
pub fn execute_models(
    args: ModelsArgs,
    model: &str,
    api_key: Option<String>,
    formatter: &Formatter,
) -> Result<()> {
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::MissingApiKey)?;
    let provider = GeminiProvider::new(api_key, model)?;

    match args.output {
        Some(path) => {
            let listing = match provider.list_models() {
                Ok(models) => formatter.format_models(&models),
                Err(e) => {
                    error!("Listing models failed: {}", e);
                    format!("Listing models:\nFULL ERROR: {}\n", e)
                }
            };
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, listing)?;
            println!("{}", formatter.success(&format!("Model list written to {}", path.display())));
        }
        None => {
            let models = provider.list_models()?;
            print!("{}", formatter.format_models(&models));
        }
    }

    Ok(())
}
