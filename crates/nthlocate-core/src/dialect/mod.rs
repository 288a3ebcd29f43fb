use std::str::FromStr;

use serde::Serialize;

use crate::error::{LocateError, Result};
use crate::expr::{Expr, Value};

/// SQL flavours an [`Expr`] can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `instr(text, pattern)`. SQLite has no three-argument form, so the
    /// start offset goes through the application-defined
    /// `locate(pattern, text, start)` the SQLite backend registers.
    Sqlite,
    /// `LOCATE(pattern, text[, start])`.
    H2,
    /// `INSTR(text, pattern[, start])` with `:n` placeholders.
    Oracle,
}

impl Dialect {
    pub const ALL: [Self; 3] = [Self::Sqlite, Self::H2, Self::Oracle];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::H2 => "h2",
            Self::Oracle => "oracle",
        }
    }

    fn placeholder(self, index: usize) -> String {
        match self {
            Self::Sqlite | Self::H2 => "?".to_string(),
            Self::Oracle => format!(":{index}"),
        }
    }
}

impl FromStr for Dialect {
    type Err = LocateError;

    fn from_str(raw: &str) -> Result<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.as_str() == wanted)
            .ok_or_else(|| {
                let expected = Self::ALL.map(Self::as_str).join("|");
                LocateError::Validation(format!(
                    "unsupported dialect '{wanted}' (expected {expected})"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSql {
    pub dialect: Dialect,
    pub sql: String,
    pub params: Vec<Value>,
}

/// Renders `expr` as a scalar SQL expression with positional parameters.
pub fn render(expr: &Expr, dialect: Dialect, max_depth: usize) -> Result<RenderedSql> {
    expr.check_nesting_depth(max_depth)?;

    let mut renderer = Renderer {
        dialect,
        sql: String::new(),
        params: Vec::new(),
    };
    renderer.expr(expr)?;
    Ok(RenderedSql {
        dialect,
        sql: renderer.sql,
        params: renderer.params,
    })
}

/// Renders `expr` as the projection of a single-table select.
pub fn render_select(
    expr: &Expr,
    dialect: Dialect,
    table: &str,
    max_depth: usize,
) -> Result<RenderedSql> {
    validate_identifier(table)?;
    let mut rendered = render(expr, dialect, max_depth)?;
    rendered.sql = format!("SELECT {} FROM \"{table}\"", rendered.sql);
    Ok(rendered)
}

pub(crate) fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_head = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Ok(());
    }
    Err(LocateError::Validation(format!("invalid identifier '{name}'")))
}

struct Renderer {
    dialect: Dialect,
    sql: String,
    params: Vec<Value>,
}

impl Renderer {
    fn expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Literal { value } => {
                self.bind(value.clone());
                Ok(())
            }
            Expr::Property { name } => {
                validate_identifier(name)?;
                self.sql.push_str(&format!("\"{name}\""));
                Ok(())
            }
            Expr::Add { expr, constant } => {
                self.sql.push('(');
                self.expr(expr)?;
                self.sql.push_str(&format!(" + {constant})"));
                Ok(())
            }
            Expr::Locate {
                text,
                pattern,
                start,
            } => {
                let (text, pattern) = (&**text, &**pattern);
                match (self.dialect, start.as_deref()) {
                    (Dialect::Sqlite, None) => self.call("instr", &[text, pattern]),
                    (Dialect::Sqlite, Some(start)) => self.call("locate", &[pattern, text, start]),
                    (Dialect::H2, None) => self.call("LOCATE", &[pattern, text]),
                    (Dialect::H2, Some(start)) => self.call("LOCATE", &[pattern, text, start]),
                    (Dialect::Oracle, None) => self.call("INSTR", &[text, pattern]),
                    (Dialect::Oracle, Some(start)) => self.call("INSTR", &[text, pattern, start]),
                }
            }
        }
    }

    fn call(&mut self, function: &str, args: &[&Expr]) -> Result<()> {
        self.sql.push_str(function);
        self.sql.push('(');
        for (idx, arg) in args.iter().enumerate() {
            if idx > 0 {
                self.sql.push_str(", ");
            }
            self.expr(arg)?;
        }
        self.sql.push(')');
        Ok(())
    }

    fn bind(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
    }
}

#[cfg(test)]
mod tests;
