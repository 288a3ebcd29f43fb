use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::types::{ToSqlOutput, Value as SqlValue};
use rusqlite::{Connection, ToSql, params, params_from_iter};

use crate::config::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
use crate::dialect::{Dialect, render_select};
use crate::error::{LocateError, Result};
use crate::expr::{Expr, Value};
use crate::models::{TEXT_RECORD_TABLE, TextRecord};

use super::{QueryBackend, single_row};

mod functions;
mod migration;

/// Renders expressions with the SQLite dialect and runs them with rusqlite.
/// Every connection gets the `locate(pattern, text, start)` function the
/// dialect relies on for start offsets.
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
    max_depth: usize,
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl SqliteBackend {
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| LocateError::mutex_poisoned("sqlite"))?;
        f(&conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        functions::register_locate(&conn)?;
        let backend = Self {
            conn: Arc::new(Mutex::new(conn)),
            max_depth: DEFAULT_MAX_DEPTH,
        };
        backend.migrate()?;
        Ok(backend)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        let backend = Self::from_connection(conn)?;
        #[cfg(unix)]
        harden_sqlite_permissions(path)?;
        tracing::debug!(path = %path.display(), "opened sqlite backend");
        Ok(backend)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Clamped to [`MAX_DEPTH_CEILING`].
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    pub fn count_records(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM text_record", [], |row| {
                row.get::<_, i64>(0)
            })?;
            usize::try_from(count).map_err(|_| {
                LocateError::Internal(format!("negative record count {count}"))
            })
        })
    }
}

impl QueryBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn persist(&self, record: &TextRecord) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO text_record(string_property, created_at) VALUES (?1, ?2)",
                params![record.string_property, Utc::now().to_rfc3339()],
            )?;
            let id = conn.last_insert_rowid();
            tracing::debug!(backend = "sqlite", id, "persisted text record");
            Ok(id)
        })
    }

    fn project_single(&self, expr: &Expr) -> Result<Option<i64>> {
        let rendered = render_select(expr, Dialect::Sqlite, TEXT_RECORD_TABLE, self.max_depth)?;
        tracing::debug!(
            backend = "sqlite",
            sql = %rendered.sql,
            params = rendered.params.len(),
            "rendered projection"
        );
        self.with_conn(|conn| {
            migration::ensure_known_columns(conn, TEXT_RECORD_TABLE, &expr.properties())?;
            let mut stmt = conn.prepare(&rendered.sql)?;
            let rows = stmt.query_map(params_from_iter(rendered.params.iter()), |row| {
                row.get::<_, Option<i64>>(0)
            })?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            single_row(out, TEXT_RECORD_TABLE)
        })
    }

    fn clear(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM text_record", [])?;
            Ok(())
        })
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(SqlValue::Null),
            Self::Integer(value) => ToSqlOutput::Owned(SqlValue::Integer(*value)),
            Self::Text(text) => ToSqlOutput::from(text.as_str()),
        })
    }
}

#[cfg(unix)]
fn harden_sqlite_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    for suffix in ["", "-wal", "-shm"] {
        let mut os = path.as_os_str().to_os_string();
        os.push(suffix);
        let candidate = PathBuf::from(os);
        if candidate.exists() {
            std::fs::set_permissions(candidate, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}
