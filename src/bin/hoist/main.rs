//! Hoist CLI - consolidate workspace dependency declarations.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("hoist=debug")
    } else {
        EnvFilter::new("hoist=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    hoist::hoist_workspace(&cli.workspace_root)?;
    hoist::resolve_aliases(&cli.workspace_root)?;

    Ok(())
}
