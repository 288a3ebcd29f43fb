//! Nth-occurrence locate expressions.
//!
//! The k-th occurrence (zero-based) is found by nesting locates:
//!
//! ```text
//! 0: locate(text, pattern)
//! 1: locate(text, pattern, locate(text, pattern) + 1)
//! 2: locate(text, pattern, locate(text, pattern, locate(text, pattern) + 1) + 1)
//! ```
//!
//! The whole chain is one expression, so a backend evaluates it in a single
//! query. Each level restarts the search one character after the start of
//! the previous match, which means overlapping matches are counted.

use crate::expr::Expr;

/// Builds the expression locating occurrence `occurrence` (zero-based) of
/// `pattern` inside `text`. Never fails; when the text holds fewer matches
/// the backend's not-found sentinel flows through the chain.
#[must_use]
pub fn nth_occurrence(text: Expr, pattern: Expr, occurrence: u32) -> Expr {
    let mut expr = Expr::locate(text.clone(), pattern.clone());
    for _ in 0..occurrence {
        expr = Expr::locate_from(text.clone(), pattern.clone(), Expr::add(expr, 1));
    }
    expr
}

/// Text and pattern bound once, reusable for any occurrence index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NthOccurrence {
    text: Expr,
    pattern: Expr,
}

impl NthOccurrence {
    pub fn new(text: Expr, pattern: Expr) -> Self {
        Self { text, pattern }
    }

    /// Locate over a stored property with a literal pattern.
    pub fn for_property(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(Expr::property(property), Expr::literal(pattern.into()))
    }

    #[must_use]
    pub fn build(&self, occurrence: u32) -> Expr {
        nth_occurrence(self.text.clone(), self.pattern.clone(), occurrence)
    }

    /// Expressions for occurrences `0..count`, each built from scratch.
    pub fn sequence(&self, count: u32) -> impl Iterator<Item = (u32, Expr)> + '_ {
        (0..count).map(move |occurrence| (occurrence, self.build(occurrence)))
    }
}
