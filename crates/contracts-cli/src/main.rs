//! # validate-contracts entry point
//!
//! Parses command-line arguments, validates every example document and
//! maps the result onto the process exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use contracts_cli::validate::{run_validate, ValidateArgs};

/// Validate example documents against the contract schemas.
///
/// Each example is matched to the first schema whose name appears in its
/// file name. Exits 0 when every example passes, 1 otherwise.
#[derive(Parser, Debug)]
#[command(name = "validate-contracts", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    args: ValidateArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Diagnostics go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    tracing::debug!(root = %root.display(), "resolved working root");

    let mut stdout = std::io::stdout().lock();
    match run_validate(&cli.args, &root, &mut stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
