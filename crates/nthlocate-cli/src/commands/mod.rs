use std::path::PathBuf;

use anyhow::{Context, Result};
use nthlocate_core::LocateConfig;

use crate::cli::Commands;

mod handlers;
mod support;
mod validation;


use self::handlers::{handle_check, handle_locate, handle_render};
pub(crate) use self::support::report_error;
use self::support::print_json;
use self::validation::validate_command_preflight;

pub(crate) fn run(sqlite_path: Option<PathBuf>, command: Commands) -> Result<()> {
    let mut config = LocateConfig::from_env().context("failed to load configuration")?;
    if let Some(path) = sqlite_path {
        config.sqlite_path = Some(path);
    }
    validate_command_preflight(&config, &command)?;
    run_validated(&config, command)
}

fn run_validated(config: &LocateConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Locate(args) => print_json(&handle_locate(config, &args)?),
        Commands::Render(args) => print_json(&handle_render(config, &args)?),
        Commands::Check(args) => {
            let reports = handle_check(config, &args)?;
            print_json(&reports)?;
            let failed = reports
                .iter()
                .filter(|report| !report.passed())
                .map(|report| report.backend.as_str())
                .collect::<Vec<_>>();
            if !failed.is_empty() {
                anyhow::bail!("conformance check failed for backend(s): {}", failed.join(", "));
            }
            Ok(())
        }
    }
}
