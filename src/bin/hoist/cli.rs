//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Hoist - consolidate per-member dependency declarations into the shared
/// [workspace.dependencies] table
#[derive(Parser)]
#[command(name = "hoist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workspace root directory (the one containing the root Cargo.toml)
    pub workspace_root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
