use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;


pub use args::{CheckArgs, LocateArgs, RenderArgs};

#[derive(Debug, Parser)]
#[command(name = "nthlocate")]
#[command(about = "Locate the nth occurrence of a pattern with nested locate queries", version)]
pub struct Cli {
    /// SQLite database file; overrides NTHLOCATE_SQLITE_PATH. In-memory when unset.
    #[arg(long, global = true)]
    pub sqlite_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Store a text and project one occurrence position from it.
    Locate(LocateArgs),
    /// Print the SQL a dialect receives for one occurrence.
    Render(RenderArgs),
    /// Verify that successive occurrences advance on each backend.
    Check(CheckArgs),
}

impl Commands {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Locate(_) => "locate",
            Self::Render(_) => "render",
            Self::Check(_) => "check",
        }
    }
}
