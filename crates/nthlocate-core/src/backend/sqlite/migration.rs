use rusqlite::{Connection, params};

use crate::error::{LocateError, Result};

use super::SqliteBackend;

const MIGRATION_SCHEMA_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS text_record (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        string_property TEXT,
        created_at TEXT NOT NULL
    );
";

impl SqliteBackend {
    pub fn migrate(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(MIGRATION_SCHEMA_SQL)?;
            ensure_required_column(
                conn,
                "text_record",
                "string_property",
                "unsupported text_record schema: string_property is missing; reset the database",
            )
        })
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let rows = stmt.query_map(params![table], |row| row.get::<_, String>(0))?;
    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    Ok(table_columns(conn, table)?.iter().any(|name| name == column))
}

/// SQLite reads a double-quoted name that matches no column as a string
/// literal, so property references are checked against the schema first.
pub(super) fn ensure_known_columns(conn: &Connection, table: &str, names: &[&str]) -> Result<()> {
    let columns = table_columns(conn, table)?;
    match names
        .iter()
        .find(|name| !columns.iter().any(|column| column.as_str() == **name))
    {
        Some(unknown) => Err(LocateError::Validation(format!(
            "unknown property '{unknown}' on {table}"
        ))),
        None => Ok(()),
    }
}

fn ensure_required_column(
    conn: &Connection,
    table: &str,
    column: &str,
    error_message: &'static str,
) -> Result<()> {
    if has_column(conn, table, column)? {
        Ok(())
    } else {
        Err(LocateError::Validation(error_message.to_string()))
    }
}
