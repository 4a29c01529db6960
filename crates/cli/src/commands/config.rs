use crate::{GlobalArgs, Subcommand};
use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use xbe_config::Config;

/// Print the effective configuration, with tokens redacted
#[derive(Clone, Debug, Parser)]
pub struct ConfigCommand {
    /// Print the path of the config file and exit
    #[clap(long)]
    path: bool,
}

impl Subcommand for ConfigCommand {
    async fn execute(self, _global: GlobalArgs) -> anyhow::Result<ExitCode> {
        if self.path {
            println!("{}", Config::path().display());
        } else {
            let config = Config::load()?.redacted();
            let yaml = serde_yaml::to_string(&config)
                .context("Error serializing configuration")?;
            print!("{yaml}");
        }
        Ok(ExitCode::SUCCESS)
    }
}
