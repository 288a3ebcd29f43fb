//! Query engines a locate expression is evaluated against.

use std::str::FromStr;

use serde::Serialize;

use crate::config::LocateConfig;
use crate::error::{LocateError, Result};
use crate::expr::Expr;
use crate::models::TextRecord;

mod locate;
mod memory;
mod sqlite;

pub use locate::locate_chars;
pub use memory::{MemoryBackend, StartOffsetPolicy};
pub use sqlite::SqliteBackend;

/// Minimal persistence and projection contract shared by every backend.
pub trait QueryBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Stores `record` and returns its generated id.
    fn persist(&self, record: &TextRecord) -> Result<i64>;

    /// Evaluates `expr` once per stored record. Exactly one record must be
    /// stored; `None` is SQL NULL.
    fn project_single(&self, expr: &Expr) -> Result<Option<i64>>;

    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Sqlite,
    Memory,
}

impl BackendKind {
    pub const ALL: [Self; 2] = [Self::Sqlite, Self::Memory];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }

    pub(crate) fn parse(raw: &str, source: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(LocateError::Validation(format!(
                "invalid {source}: {other} (expected sqlite|memory)"
            ))),
        }
    }
}

impl FromStr for BackendKind {
    type Err = LocateError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::parse(raw, "backend")
    }
}

/// Opens a fresh backend of `kind` configured from `config`.
pub fn open_backend(kind: BackendKind, config: &LocateConfig) -> Result<Box<dyn QueryBackend>> {
    match kind {
        BackendKind::Sqlite => {
            let backend = match &config.sqlite_path {
                Some(path) => SqliteBackend::open(path)?,
                None => SqliteBackend::open_in_memory()?,
            };
            Ok(Box::new(backend.with_max_depth(config.max_depth)))
        }
        BackendKind::Memory => Ok(Box::new(
            MemoryBackend::new().with_max_depth(config.max_depth),
        )),
    }
}

/// Collapses projected rows into the single value a projection returns.
pub(crate) fn single_row<T>(mut rows: Vec<T>, table: &str) -> Result<T> {
    match rows.len() {
        0 => Err(LocateError::NotFound(format!("no rows in {table}"))),
        1 => rows
            .pop()
            .ok_or_else(|| LocateError::Internal("row vanished".to_string())),
        rows => Err(LocateError::NonUniqueResult { rows }),
    }
}
