//! isoarc-build - Archive data builder
//!
//! Converts the works and figures spreadsheet exports into the normalized
//! `works.json` / `figures.json` files read by the site front-end.
//!
//! **Usage:**
//! ```bash
//! isoarc-build [--works <csv>] [--figures <csv>] [--out <dir>] [--config <toml>]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use isoarc_common::config::{discover_config, PathOverrides, PathResolver};
use isoarc_common::pipeline::{self, BuildReport};
use tracing::{info, warn};

/// Command-line arguments for isoarc-build
#[derive(Parser, Debug)]
#[command(name = "isoarc-build")]
#[command(about = "Build site JSON from the works/figures CSV exports")]
#[command(version)]
struct Args {
    /// Path to works.csv [default: data-source/works.csv]
    #[arg(long, value_name = "PATH")]
    works: Option<PathBuf>,

    /// Path to figures.csv [default: data-source/figures.csv]
    #[arg(long, value_name = "PATH")]
    figures: Option<PathBuf>,

    /// Output folder for the JSON files [default: public/data]
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// TOML config file (otherwise $ISOARC_CONFIG, ./isoarc.toml, or the user config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config =
        discover_config(args.config.as_deref()).context("Failed to load configuration")?;
    let resolver = PathResolver::new(config);

    // Initialize tracing: RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(resolver.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    let paths = resolver.resolve(&PathOverrides {
        works_csv: args.works,
        figures_csv: args.figures,
        out_dir: args.out,
    });
    info!(
        "Starting isoarc-build v{}: works={} figures={} out={}",
        env!("CARGO_PKG_VERSION"),
        paths.works_csv.display(),
        paths.figures_csv.display(),
        paths.out_dir.display()
    );

    let report = pipeline::run(&paths)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &BuildReport) {
    for diagnostic in &report.diagnostics {
        warn!("{}", diagnostic);
    }

    println!(
        "Wrote {} works -> {}",
        report.works_written,
        report.works_json.display()
    );
    println!(
        "Wrote {} figures -> {}",
        report.figures_written,
        report.figures_json.display()
    );
}
