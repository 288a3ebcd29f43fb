use std::path::PathBuf;

use crate::backend::BackendKind;
use crate::error::Result;

mod env;

pub const ENV_SQLITE_PATH: &str = "NTHLOCATE_SQLITE_PATH";
pub const ENV_MAX_DEPTH: &str = "NTHLOCATE_MAX_DEPTH";
pub const ENV_DEFAULT_PATTERN: &str = "NTHLOCATE_DEFAULT_PATTERN";
pub const ENV_BACKENDS: &str = "NTHLOCATE_BACKENDS";

pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Upper bound for `max_depth`. Larger values are clamped to it.
pub const MAX_DEPTH_CEILING: usize = 256;
pub const DEFAULT_PATTERN: &str = "()";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateConfig {
    /// Database file for the SQLite backend; in-memory when unset.
    pub sqlite_path: Option<PathBuf>,
    pub max_depth: usize,
    pub default_pattern: String,
    /// Backends a conformance check runs against when none are named.
    pub backends: Vec<BackendKind>,
}

impl Default for LocateConfig {
    fn default() -> Self {
        Self {
            sqlite_path: None,
            max_depth: DEFAULT_MAX_DEPTH,
            default_pattern: DEFAULT_PATTERN.to_string(),
            backends: BackendKind::ALL.to_vec(),
        }
    }
}

impl LocateConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backends = env::parse_list(lookup(ENV_BACKENDS).as_deref())
            .iter()
            .map(|raw| BackendKind::parse(raw, ENV_BACKENDS))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sqlite_path: env::non_empty(lookup(ENV_SQLITE_PATH)).map(PathBuf::from),
            max_depth: env::parse_usize(lookup(ENV_MAX_DEPTH).as_deref(), DEFAULT_MAX_DEPTH, 1)
                .min(MAX_DEPTH_CEILING),
            default_pattern: lookup(ENV_DEFAULT_PATTERN)
                .filter(|pattern| !pattern.is_empty())
                .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            backends: if backends.is_empty() {
                BackendKind::ALL.to_vec()
            } else {
                backends
            },
        })
    }
}
