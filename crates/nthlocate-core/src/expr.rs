//! Composable query expressions.
//!
//! An [`Expr`] is an immutable tree built fresh per query and evaluated by a
//! [`QueryBackend`](crate::backend::QueryBackend) as a single projection.

use std::fmt;

use serde::Serialize;

use crate::error::{LocateError, Result};

/// Scalar value carried by literals and bind parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Literal {
        value: Value,
    },
    Property {
        name: String,
    },
    /// 1-based position of `pattern` inside `text`, searching from `start`
    /// when present and from the beginning otherwise. 0 when absent.
    Locate {
        text: Box<Expr>,
        pattern: Box<Expr>,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<Box<Expr>>,
    },
    Add {
        expr: Box<Expr>,
        constant: i64,
    },
}

impl Expr {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self::Property { name: name.into() }
    }

    pub fn locate(text: Self, pattern: Self) -> Self {
        Self::Locate {
            text: Box::new(text),
            pattern: Box::new(pattern),
            start: None,
        }
    }

    pub fn locate_from(text: Self, pattern: Self, start: Self) -> Self {
        Self::Locate {
            text: Box::new(text),
            pattern: Box::new(pattern),
            start: Some(Box::new(start)),
        }
    }

    pub fn add(expr: Self, constant: i64) -> Self {
        Self::Add {
            expr: Box::new(expr),
            constant,
        }
    }

    /// Number of locate levels stacked through start offsets.
    #[must_use]
    pub fn locate_nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0_usize)];
        while let Some((expr, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match expr {
                Self::Literal { .. } | Self::Property { .. } => {}
                Self::Add { expr, .. } => pending.push((&**expr, depth)),
                Self::Locate {
                    text,
                    pattern,
                    start,
                } => {
                    pending.push((&**text, depth));
                    pending.push((&**pattern, depth));
                    if let Some(start) = start {
                        pending.push((&**start, depth + 1));
                    }
                }
            }
        }
        deepest
    }

    pub(crate) fn check_nesting_depth(&self, max_depth: usize) -> Result<()> {
        let depth = self.locate_nesting_depth();
        if depth > max_depth {
            return Err(LocateError::Validation(format!(
                "locate nesting depth {depth} exceeds the limit of {max_depth}"
            )));
        }
        Ok(())
    }

    /// Property names referenced anywhere in the tree, in visit order.
    #[must_use]
    pub fn properties(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match expr {
                Self::Literal { .. } => {}
                Self::Property { name } => out.push(name.as_str()),
                Self::Add { expr, .. } => pending.push(&**expr),
                Self::Locate {
                    text,
                    pattern,
                    start,
                } => {
                    pending.extend(start.as_deref());
                    pending.push(&**pattern);
                    pending.push(&**text);
                }
            }
        }
        out
    }
}

// Iterative so that deep occurrence chains drop without recursing.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut child) = pending.pop() {
            child.detach_children(&mut pending);
        }
    }
}

impl Expr {
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        match self {
            Self::Literal { .. } | Self::Property { .. } => {}
            Self::Add { expr, .. } => detach(expr, out),
            Self::Locate {
                text,
                pattern,
                start,
            } => {
                detach(text, out);
                detach(pattern, out);
                out.extend(start.take().map(|start| *start));
            }
        }
    }
}

fn detach(slot: &mut Box<Expr>, out: &mut Vec<Expr>) {
    if !matches!(**slot, Expr::Literal { .. } | Expr::Property { .. }) {
        out.push(*std::mem::replace(slot, Box::new(Expr::literal(Value::Null))));
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "'{}'", value.replace('\'', "''")),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value } => write!(f, "{value}"),
            Self::Property { name } => f.write_str(name),
            Self::Locate {
                text,
                pattern,
                start: None,
            } => write!(f, "locate({text}, {pattern})"),
            Self::Locate {
                text,
                pattern,
                start: Some(start),
            } => write!(f, "locate({text}, {pattern}, {start})"),
            Self::Add { expr, constant } => write!(f, "({expr} + {constant})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_nested_structure() {
        let first = Expr::locate(Expr::property("body"), Expr::literal("()"));
        let second = Expr::locate_from(
            Expr::property("body"),
            Expr::literal("()"),
            Expr::add(first, 1),
        );
        assert_eq!(
            second.to_string(),
            "locate(body, '()', (locate(body, '()') + 1))"
        );
    }

    #[test]
    fn display_escapes_quotes_in_text_literals() {
        assert_eq!(Expr::literal("it's").to_string(), "'it''s'");
        assert_eq!(Expr::literal(Value::Null).to_string(), "null");
    }

    #[test]
    fn nesting_depth_counts_only_start_offsets() {
        let plain = Expr::locate(Expr::property("body"), Expr::literal("x"));
        assert_eq!(plain.locate_nesting_depth(), 0);

        let literal_start =
            Expr::locate_from(Expr::property("body"), Expr::literal("x"), Expr::literal(4_i64));
        assert_eq!(literal_start.locate_nesting_depth(), 1);

        let nested = Expr::locate_from(
            Expr::property("body"),
            Expr::literal("x"),
            Expr::add(plain, 1),
        );
        assert_eq!(nested.locate_nesting_depth(), 1);
    }

    #[test]
    fn nesting_depth_takes_the_deepest_branch() {
        let one = Expr::locate_from(Expr::property("a"), Expr::literal("x"), Expr::literal(1_i64));
        let two = Expr::locate_from(Expr::property("a"), Expr::literal("x"), one.clone());
        let mixed = Expr::locate_from(two, Expr::literal("x"), one);
        assert_eq!(mixed.locate_nesting_depth(), 2);
        assert!(mixed.check_nesting_depth(2).is_ok());
        let err = mixed.check_nesting_depth(1).expect_err("too deep");
        assert!(err.to_string().contains("depth 2"));
    }

    #[test]
    fn properties_are_collected_from_every_operand() {
        let expr = Expr::locate_from(
            Expr::property("a"),
            Expr::property("b"),
            Expr::add(Expr::property("c"), 1),
        );
        assert_eq!(expr.properties(), vec!["a", "b", "c"]);
    }

    #[test]
    fn optional_values_map_to_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn serializes_with_kind_tags() {
        let expr = Expr::locate(Expr::property("body"), Expr::literal("()"));
        let json = serde_json::to_value(&expr).expect("json");
        assert_eq!(json["kind"], "locate");
        assert_eq!(json["text"]["kind"], "property");
        assert_eq!(json["pattern"]["value"], "()");
        assert!(json.get("start").is_none());
    }
}
