//! Archparam CLI - extract architectural parameters from specification text.

use archparam_cli::cli::ExtractArgs;
use archparam_cli::commands;
use archparam_cli::logging::init_logging;
use archparam_cli::output::OutputFormat;
use archparam_cli::{Cli, Command, Config, Formatter};
use clap::Parser;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> archparam_cli::Result<()> {
    // .env must be loaded before clap reads env-backed flags
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.model, None, cli.log_file, Vec::new());

    init_logging(&config.log_file, cli.verbose, cli.quiet)?;

    let format = cli.format.map(Into::into).unwrap_or(OutputFormat::Text);
    let formatter = Formatter::new(format, !cli.no_color);

    match cli.command {
        None => {
            commands::execute_extract(ExtractArgs::default(), config, cli.api_key, &formatter)?;
        }
        Some(Command::Extract(args)) => {
            commands::execute_extract(args, config, cli.api_key, &formatter)?;
        }
        Some(Command::Models(args)) => {
            commands::execute_models(args, &config.model, cli.api_key, &formatter)?;
        }
    }

    Ok(())
}
