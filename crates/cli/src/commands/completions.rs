use crate::{Args, COMMAND_NAME, GlobalArgs, Subcommand};
use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::{io, process::ExitCode};

/// Print a shell completion script
///
/// For example, in bash: `source <(xbe completions --shell bash)`
#[derive(Clone, Debug, Parser)]
pub struct CompletionsCommand {
    /// Shell to generate for. Defaults to the shell in $SHELL
    #[clap(long)]
    shell: Option<Shell>,
}

impl Subcommand for CompletionsCommand {
    async fn execute(self, _global: GlobalArgs) -> anyhow::Result<ExitCode> {
        let shell = self
            .shell
            .or_else(Shell::from_env)
            .context("Unable to detect shell; pass --shell")?;
        clap_complete::generate(
            shell,
            &mut Args::command(),
            COMMAND_NAME,
            &mut io::stdout(),
        );
        Ok(ExitCode::SUCCESS)
    }
}
