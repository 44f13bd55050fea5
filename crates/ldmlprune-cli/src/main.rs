use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use ldmlprune::{PruneOptions, prune_dir};

#[derive(Debug, Parser)]
#[command(
    name = "ldmlprune",
    version,
    about = "Delete LDML locale files that contain nothing but identity data"
)]
struct Args {
    /// Directory of generated locale files (not descended into)
    #[arg(value_name = "DIR")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let summary = prune_dir(&args.dir, &PruneOptions::default())
        .with_context(|| format!("failed to prune {}", args.dir.display()))?;

    tracing::debug!(deleted = ?summary.deleted, "done");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
