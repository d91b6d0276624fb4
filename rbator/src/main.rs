//! `rbator`: rasterbate an image into a dot poster and printable pages.
//!
//! Parses arguments, sets up tracing, then renders the poster and, when a
//! page size is given, slices it into pages next to the poster file.

mod cli;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use rasterbate::{FileSink, Rasterbator};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_exit_code(e.kind()));
        }
    };

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    run(&cli)
}

/// Exit status for a failed parse: 0 for `--help`/`--version`, 1 for usage
/// errors (instead of clap's 2).
fn usage_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = cli.raster_options();
    let geometry = cli.page_geometry()?;

    let mut rasterbator = Rasterbator::open(&cli.input, options)
        .with_context(|| format!("Cannot read {}", cli.input.display()))?;

    rasterbator
        .rasterbate(&mut FileSink)
        .context("Rasterizing failed")?;

    if let Some(geometry) = geometry {
        let pages = rasterbator
            .paginate(&geometry, &mut FileSink)
            .context("Pagination failed")?;
        tracing::info!(pages = pages.len(), "Pages written");
    }

    Ok(())
}
