// Public fallible APIs in this crate share one concrete error contract (`LocateError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod backend;
pub mod config;
pub mod conformance;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod models;
pub mod nth;

pub use backend::{BackendKind, MemoryBackend, QueryBackend, SqliteBackend, StartOffsetPolicy};
pub use config::LocateConfig;
pub use dialect::{Dialect, RenderedSql};
pub use error::{ErrorPayload, LocateError, Result};
pub use expr::{Expr, Value};
pub use nth::{NthOccurrence, nth_occurrence};
