use std::io::{self, Write};

use anyhow::Result;
use nthlocate_core::{ErrorPayload, LocateConfig, LocateError};

const COMMAND_FAILED: &str = "COMMAND_FAILED";

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub(super) fn resolve_pattern<'a>(config: &'a LocateConfig, explicit: Option<&'a str>) -> &'a str {
    explicit.unwrap_or(config.default_pattern.as_str())
}

pub(super) fn error_payload(operation: &str, err: &anyhow::Error) -> ErrorPayload {
    let message = format!("{err:#}");
    match err.downcast_ref::<LocateError>() {
        Some(inner) => ErrorPayload {
            message,
            ..inner.to_payload(operation)
        },
        None => ErrorPayload::new(COMMAND_FAILED, message, operation),
    }
}

/// Writes the failure as JSON on stderr; falls back to plain text when the
/// payload cannot be written.
pub(crate) fn report_error(operation: &str, err: &anyhow::Error) {
    let payload = error_payload(operation, err);
    let mut stderr = io::stderr().lock();
    let written = serde_json::to_writer_pretty(&mut stderr, &payload)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(stderr));
    if written.is_err() {
        let _ = writeln!(stderr, "Error: {err:#}");
    }
}
