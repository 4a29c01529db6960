//! Test-only binary for CLI integration tests. Unfortunately I can't figure out
//! how to make this compile only in `cfg(test)`, so its dependencies (tokio)
//! can't be in dev-dependencies. This doesn't actually add anything to the
//! final dependency tree though.

use std::process::ExitCode;
use xbe_cli::{Args, print_error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.subcommand
        .execute(args.global)
        .await
        .unwrap_or_else(|error| {
            print_error(&error);
            ExitCode::FAILURE
        })
}
