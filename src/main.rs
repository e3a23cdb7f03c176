//! MediDesk binary entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use medidesk_rs::cli::{Cli, execute};

fn main() -> ExitCode {
    // Load .env if present; a missing file is not an error.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                let _ = writeln!(std::io::stdout(), "{output}");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(std::io::stderr(), "error: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes tracing to stderr so the event stream on stdout stays clean.
///
/// `RUST_LOG` takes precedence; `--verbose` raises the default to debug.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "medidesk_rs=debug"
    } else {
        "medidesk_rs=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
