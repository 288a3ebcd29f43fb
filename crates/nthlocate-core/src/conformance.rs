//! Cross-backend check that nested locates really advance.
//!
//! A backend that drops the start offset of the three-argument locate
//! returns the first position for every occurrence index. The probe runs
//! the same occurrence sequence against a backend and compares the results
//! with positions computed directly from the text.

use serde::Serialize;

use crate::backend::{QueryBackend, locate_chars};
use crate::error::{LocateError, Result};
use crate::models::{STRING_PROPERTY, TextRecord};
use crate::nth::NthOccurrence;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceReport {
    pub backend: String,
    pub text: String,
    pub pattern: String,
    pub occurrences: u32,
    pub expected: Vec<i64>,
    pub observed: Vec<Option<i64>>,
    pub pairwise_distinct: bool,
    pub strictly_increasing: bool,
    pub matches_expected: bool,
}

impl ConformanceReport {
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.pairwise_distinct && self.strictly_increasing && self.matches_expected
    }
}

/// Positions the nested chain must produce, following the same rule: each
/// search restarts one character after the previous result.
#[must_use]
pub fn expected_positions(text: &str, pattern: &str, occurrences: u32) -> Vec<i64> {
    let mut out = Vec::new();
    let mut previous = None;
    for _ in 0..occurrences {
        let position = match previous {
            None => locate_chars(text, pattern, 1),
            Some(previous) => locate_chars(text, pattern, previous + 1),
        };
        out.push(position);
        previous = Some(position);
    }
    out
}

/// Replaces the backend's records with `text`, then projects occurrences
/// `0..occurrences` of `pattern` one query each.
pub fn probe(
    backend: &dyn QueryBackend,
    text: &str,
    pattern: &str,
    occurrences: u32,
) -> Result<ConformanceReport> {
    if occurrences == 0 {
        return Err(LocateError::Validation(
            "conformance probe needs at least one occurrence".to_string(),
        ));
    }

    backend.clear()?;
    backend.persist(&TextRecord::new(text))?;

    let builder = NthOccurrence::for_property(STRING_PROPERTY, pattern);
    let mut observed = Vec::new();
    for (_, expr) in builder.sequence(occurrences) {
        observed.push(backend.project_single(&expr)?);
    }

    let expected = expected_positions(text, pattern, occurrences);
    let report = ConformanceReport {
        backend: backend.name().to_string(),
        text: text.to_string(),
        pattern: pattern.to_string(),
        occurrences,
        pairwise_distinct: pairwise_distinct(&observed),
        strictly_increasing: strictly_increasing(&observed),
        matches_expected: observed
            .iter()
            .copied()
            .eq(expected.iter().copied().map(Some)),
        expected,
        observed,
    };

    if report.passed() {
        tracing::debug!(
            backend = %report.backend,
            observed = ?report.observed,
            "conformance probe passed"
        );
    } else {
        tracing::warn!(
            backend = %report.backend,
            observed = ?report.observed,
            expected = ?report.expected,
            "conformance probe failed"
        );
    }
    Ok(report)
}

fn pairwise_distinct(values: &[Option<i64>]) -> bool {
    values
        .iter()
        .enumerate()
        .all(|(idx, value)| !values[idx + 1..].contains(value))
}

fn strictly_increasing(values: &[Option<i64>]) -> bool {
    values.windows(2).all(|pair| match (pair[0], pair[1]) {
        (Some(a), Some(b)) => b > a,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use crate::backend::{MemoryBackend, SqliteBackend, StartOffsetPolicy};

    use super::*;

    const SCENARIO: &str = "Finding not the first () but the second () occurrence of ().";

    #[test]
    fn expected_positions_follow_the_restart_rule() {
        assert_eq!(expected_positions(SCENARIO, "()", 3), vec![23, 41, 58]);
        assert_eq!(expected_positions(SCENARIO, "()", 5), vec![23, 41, 58, 0, 23]);
        assert_eq!(expected_positions("aaa", "aa", 3), vec![1, 2, 0]);
    }

    #[test]
    fn honest_backends_pass() {
        let backends: Vec<Box<dyn QueryBackend>> = vec![
            Box::new(SqliteBackend::open_in_memory().expect("sqlite")),
            Box::new(MemoryBackend::new()),
        ];
        for backend in &backends {
            let report = probe(backend.as_ref(), SCENARIO, "()", 3).expect("probe");
            assert!(report.passed(), "{report:?}");
            assert_eq!(report.observed, vec![Some(23), Some(41), Some(58)]);
        }
    }

    #[test]
    fn offset_ignoring_backend_fails() {
        let backend = MemoryBackend::new().with_start_policy(StartOffsetPolicy::Ignore);
        let report = probe(&backend, SCENARIO, "()", 3).expect("probe");
        assert!(!report.passed());
        assert!(!report.pairwise_distinct);
        assert!(!report.strictly_increasing);
        assert!(!report.matches_expected);
        assert_eq!(report.backend, "memory-ignore-start");
    }

    #[test]
    fn too_few_matches_is_reported_not_raised() {
        let backend = MemoryBackend::new();
        let report = probe(&backend, "only () once", "()", 3).expect("probe");
        assert_eq!(report.observed, vec![Some(6), Some(0), Some(6)]);
        assert!(report.matches_expected);
        assert!(!report.passed());
    }

    #[test]
    fn probe_replaces_previous_records() {
        let backend = MemoryBackend::new();
        backend.persist(&TextRecord::new("stale")).expect("persist");
        let report = probe(&backend, SCENARIO, "()", 2).expect("probe");
        assert!(report.passed());
    }

    #[test]
    fn zero_occurrences_is_rejected() {
        let backend = MemoryBackend::new();
        let err = probe(&backend, SCENARIO, "()", 0).expect_err("reject");
        assert!(matches!(err, LocateError::Validation(_)));
    }

    #[test]
    fn single_occurrence_trivially_increases() {
        assert!(strictly_increasing(&[Some(3)]));
        assert!(pairwise_distinct(&[Some(3)]));
        assert!(!strictly_increasing(&[Some(3), None]));
        assert!(!pairwise_distinct(&[None, Some(1), None]));
    }
}
