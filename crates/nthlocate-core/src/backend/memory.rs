use std::sync::Mutex;

use serde::Serialize;

use crate::config::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
use crate::error::{LocateError, Result};
use crate::expr::{Expr, Value};
use crate::models::{STRING_PROPERTY, TEXT_RECORD_TABLE, TextRecord};

use super::{QueryBackend, locate_chars, single_row};

/// How the three-argument locate treats its start offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOffsetPolicy {
    #[default]
    Honor,
    /// Drops the start offset and always searches from the beginning, the
    /// way an engine that only implements two-argument locate behaves.
    Ignore,
}

/// Interprets expressions directly over records held in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    records: Mutex<Vec<TextRecord>>,
    start_policy: StartOffsetPolicy,
    max_depth: usize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            start_policy: StartOffsetPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamped to [`MAX_DEPTH_CEILING`].
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    #[must_use]
    pub fn with_start_policy(mut self, policy: StartOffsetPolicy) -> Self {
        self.start_policy = policy;
        self
    }

    fn with_records<T>(&self, f: impl FnOnce(&mut Vec<TextRecord>) -> Result<T>) -> Result<T> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| LocateError::mutex_poisoned("memory records"))?;
        f(&mut records)
    }

    fn eval(&self, expr: &Expr, record: &TextRecord) -> Result<Value> {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Property { name } => property_value(record, name),
            Expr::Add { expr, constant } => match self.eval(expr, record)? {
                Value::Null => Ok(Value::Null),
                Value::Integer(value) => value
                    .checked_add(*constant)
                    .map(Value::Integer)
                    .ok_or_else(|| {
                        LocateError::Evaluation(format!("integer overflow in {value} + {constant}"))
                    }),
                Value::Text(text) => Err(LocateError::Evaluation(format!(
                    "cannot add {constant} to text '{text}'"
                ))),
            },
            Expr::Locate {
                text,
                pattern,
                start,
            } => {
                let Some(text) = as_text(self.eval(text, record)?) else {
                    return Ok(Value::Null);
                };
                let Some(pattern) = as_text(self.eval(pattern, record)?) else {
                    return Ok(Value::Null);
                };
                let start = match start {
                    None => 1,
                    Some(start) => match self.eval(start, record)? {
                        Value::Null => return Ok(Value::Null),
                        Value::Integer(start) => start,
                        Value::Text(raw) => {
                            return Err(LocateError::Evaluation(format!(
                                "locate start offset must be an integer, got text '{raw}'"
                            )));
                        }
                    },
                };
                let start = match self.start_policy {
                    StartOffsetPolicy::Honor => start,
                    StartOffsetPolicy::Ignore => 1,
                };
                Ok(Value::Integer(locate_chars(&text, &pattern, start)))
            }
        }
    }
}

impl QueryBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        match self.start_policy {
            StartOffsetPolicy::Honor => "memory",
            StartOffsetPolicy::Ignore => "memory-ignore-start",
        }
    }

    fn persist(&self, record: &TextRecord) -> Result<i64> {
        self.with_records(|records| {
            let id = records
                .iter()
                .filter_map(|record| record.id)
                .max()
                .unwrap_or(0)
                + 1;
            records.push(TextRecord {
                id: Some(id),
                string_property: record.string_property.clone(),
            });
            tracing::debug!(backend = self.name(), id, "persisted text record");
            Ok(id)
        })
    }

    fn project_single(&self, expr: &Expr) -> Result<Option<i64>> {
        expr.check_nesting_depth(self.max_depth)?;
        let values = self.with_records(|records| {
            records
                .iter()
                .map(|record| self.eval(expr, record))
                .collect::<Result<Vec<_>>>()
        })?;
        let value = single_row(values, TEXT_RECORD_TABLE)?;
        tracing::debug!(backend = self.name(), %expr, ?value, "evaluated projection");
        match value {
            Value::Null => Ok(None),
            Value::Integer(value) => Ok(Some(value)),
            Value::Text(text) => Err(LocateError::Evaluation(format!(
                "projection produced text '{text}' where an integer was expected"
            ))),
        }
    }

    fn clear(&self) -> Result<()> {
        self.with_records(|records| {
            records.clear();
            Ok(())
        })
    }
}

fn property_value(record: &TextRecord, name: &str) -> Result<Value> {
    match name {
        "id" => Ok(record.id.into()),
        STRING_PROPERTY => Ok(Value::Text(record.string_property.clone())),
        other => Err(LocateError::Validation(format!(
            "unknown property '{other}' on {TEXT_RECORD_TABLE}"
        ))),
    }
}

fn as_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(value) => Some(value.to_string()),
        Value::Text(text) => Some(text),
    }
}
