use anyhow::Result;
use nthlocate_core::{LocateConfig, LocateError};

use crate::cli::Commands;

pub(super) fn validate_command_preflight(config: &LocateConfig, command: &Commands) -> Result<()> {
    match command {
        Commands::Locate(args) => {
            validate_occurrence(config, args.occurrence)?;
            validate_pattern(args.pattern.as_deref())
        }
        Commands::Render(args) => {
            validate_occurrence(config, args.occurrence)?;
            validate_pattern(args.pattern.as_deref())
        }
        Commands::Check(args) => {
            if args.occurrences == 0 {
                return Err(invalid("--occurrences must be at least 1".to_string()));
            }
            validate_occurrence(config, args.occurrences - 1)?;
            validate_pattern(args.pattern.as_deref())
        }
    }
}

/// Occurrence `n` nests `n` locate calls, so the index is bounded by the
/// configured depth.
fn validate_occurrence(config: &LocateConfig, occurrence: u32) -> Result<()> {
    let depth = usize::try_from(occurrence).unwrap_or(usize::MAX);
    if depth > config.max_depth {
        return Err(invalid(format!(
            "occurrence {occurrence} exceeds the maximum nesting depth of {}",
            config.max_depth
        )));
    }
    Ok(())
}

fn validate_pattern(pattern: Option<&str>) -> Result<()> {
    if pattern.is_some_and(str::is_empty) {
        return Err(invalid("--pattern must not be empty".to_string()));
    }
    Ok(())
}

fn invalid(message: String) -> anyhow::Error {
    LocateError::Validation(message).into()
}
