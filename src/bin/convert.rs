//! artifact-convert: turn a flat CSV export into the dataset JSON read by the
//! viewer.
//!
//! Run with: cargo run --bin artifact-convert --features cli -- log.csv data.json

use artifact_viewer::dataset::convert::convert_csv_file;
use artifact_viewer::Dataset;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Group CSV query rows by paper and artifact and write them as JSON
#[derive(Parser, Debug)]
#[command(name = "artifact-convert", version, about, long_about = None)]
struct Cli {
    /// Input CSV with arxiv_id, artifact_id and artifact_text columns
    input: PathBuf,

    /// Output JSON file
    output: PathBuf,

    /// Load the written file back as a dataset and report its size
    #[arg(long)]
    check: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = convert_csv_file(&cli.input, &cli.output) {
        error!(input = %cli.input.display(), "{}", e);
        return ExitCode::FAILURE;
    }

    if cli.check {
        match Dataset::load(&cli.output) {
            Ok(dataset) => info!(
                papers = dataset.len(),
                artifacts = dataset.artifact_count(),
                "Output loads as a dataset"
            ),
            Err(e) => {
                error!(output = %cli.output.display(), "Output does not load: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
