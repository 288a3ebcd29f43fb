use clap::Args;
use nthlocate_core::{BackendKind, Dialect};

#[derive(Debug, Args)]
pub struct LocateArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub text: String,
    /// Substring to find. Defaults to NTHLOCATE_DEFAULT_PATTERN, then `()`.
    #[arg(long, allow_hyphen_values = true)]
    pub pattern: Option<String>,
    /// Zero-based occurrence index.
    #[arg(long, default_value_t = 0)]
    pub occurrence: u32,
    #[arg(long, default_value = "sqlite")]
    pub backend: BackendKind,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub pattern: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub occurrence: u32,
    #[arg(long, default_value = "sqlite")]
    pub dialect: Dialect,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub text: String,
    #[arg(long, allow_hyphen_values = true)]
    pub pattern: Option<String>,
    /// Number of successive occurrences to probe, starting at 0.
    #[arg(long, default_value_t = 3)]
    pub occurrences: u32,
    /// Backends to probe; repeatable. Defaults to NTHLOCATE_BACKENDS, then all.
    #[arg(long = "backend", value_name = "BACKEND")]
    pub backends: Vec<BackendKind>,
}
