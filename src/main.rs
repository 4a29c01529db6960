#![forbid(unsafe_code)]
#![deny(clippy::all)]

//! Command line client for the XBE platform API. All of the functionality
//! lives in `xbe_cli`; this binary only sets up logging and reports errors.

use anyhow::Context;
use std::{fs::File, process::ExitCode};
use tracing_subscriber::{filter::EnvFilter, prelude::*};
use xbe_cli::{Args, print_error};
use xbe_util::paths;

/// Env var holding the log filter, e.g. `XBE_LOG=debug`
const LOG_ENV_VAR: &str = "XBE_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logging is best-effort. A broken log file shouldn't stop the command
    if let Err(error) = initialize_tracing() {
        eprintln!("Error initializing logging: {error:#}");
    }

    match args.subcommand.execute(args.global).await {
        Ok(exit_code) => exit_code,
        Err(error) => {
            print_error(&error);
            ExitCode::FAILURE
        }
    }
}

/// Set up tracing to log to a file. Nothing is logged to stdout or stderr
/// because those carry command output.
fn initialize_tracing() -> anyhow::Result<()> {
    let path = paths::log_file();
    paths::create_parent(&path)
        .with_context(|| format!("Error creating log directory for {path:?}"))?;
    let log_file = File::create(&path)
        .with_context(|| format!("Error creating log file {path:?}"))?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let file_subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(filter);
    tracing_subscriber::registry()
        .with(file_subscriber)
        .try_init()
        .context("Error initializing tracing subscriber")?;
    Ok(())
}
