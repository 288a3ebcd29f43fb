use anyhow::{Context, Result};
use nthlocate_core::backend::open_backend;
use nthlocate_core::conformance::{ConformanceReport, probe};
use nthlocate_core::dialect::render_select;
use nthlocate_core::models::{LocateResult, STRING_PROPERTY, TEXT_RECORD_TABLE, TextRecord};
use nthlocate_core::{LocateConfig, NthOccurrence, RenderedSql};

use crate::cli::{CheckArgs, LocateArgs, RenderArgs};

use super::support::resolve_pattern;

pub(super) fn handle_locate(config: &LocateConfig, args: &LocateArgs) -> Result<LocateResult> {
    let pattern = resolve_pattern(config, args.pattern.as_deref());
    let expr = NthOccurrence::for_property(STRING_PROPERTY, pattern).build(args.occurrence);

    let backend = open_backend(args.backend, config)
        .with_context(|| format!("failed to open {} backend", args.backend.as_str()))?;
    backend.clear()?;
    backend.persist(&TextRecord::new(args.text.as_str()))?;
    let position = backend.project_single(&expr)?;

    Ok(LocateResult {
        backend: backend.name().to_string(),
        occurrence: args.occurrence,
        expression: expr.to_string(),
        position,
    })
}

pub(super) fn handle_render(config: &LocateConfig, args: &RenderArgs) -> Result<RenderedSql> {
    let pattern = resolve_pattern(config, args.pattern.as_deref());
    let expr = NthOccurrence::for_property(STRING_PROPERTY, pattern).build(args.occurrence);
    Ok(render_select(
        &expr,
        args.dialect,
        TEXT_RECORD_TABLE,
        config.max_depth,
    )?)
}

pub(super) fn handle_check(
    config: &LocateConfig,
    args: &CheckArgs,
) -> Result<Vec<ConformanceReport>> {
    let pattern = resolve_pattern(config, args.pattern.as_deref());
    let kinds = if args.backends.is_empty() {
        config.backends.clone()
    } else {
        args.backends.clone()
    };

    let mut reports = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let backend = open_backend(kind, config)
            .with_context(|| format!("failed to open {} backend", kind.as_str()))?;
        reports.push(probe(backend.as_ref(), &args.text, pattern, args.occurrences)?);
    }
    Ok(reports)
}
