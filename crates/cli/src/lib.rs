#![forbid(unsafe_code)]
#![deny(clippy::all)]

//! Command line interface for the XBE platform API.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `xbe` crate version. If you choose to depend directly on this crate, you do
//! so at your own risk of breakage.

mod commands;
mod resources;
mod util;

pub use crate::util::print_error;

use crate::commands::{
    act::DoCommand, completions::CompletionsCommand, config::ConfigCommand,
    resource_types::ResourcesCommand, view::ViewCommand,
};
use anyhow::{Context, bail};
use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use url::Url;
use xbe_config::Config;
use xbe_core::{
    auth::{self, AuthError},
    http::XbeClient,
};

const COMMAND_NAME: &str = "xbe";

/// Used when neither the command line, the environment nor the config file
/// name a base URL
const DEFAULT_BASE_URL: &str = "https://server.x-b-e.com";

#[derive(Debug, Parser)]
#[clap(
    author,
    version,
    about,
    name = COMMAND_NAME,
    long_about = "Command line client for the XBE platform. Read data with \
    `xbe view` and change it with `xbe do`"
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub subcommand: CliCommand,
}

impl Args {
    /// Alias for [clap::Parser::parse]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// Arguments that are available to all subcommands
#[derive(Clone, Debug, Default, Parser)]
pub struct GlobalArgs {
    /// Print JSON instead of a table or detail block
    #[clap(long, global = true)]
    pub json: bool,
    /// With --json, drop null and empty values from objects
    #[clap(long, global = true)]
    pub omit_null: bool,
    /// API base URL. Defaults to `base_url` from the config file, then
    /// https://server.x-b-e.com
    #[clap(long, global = true, env = "XBE_BASE_URL")]
    pub base_url: Option<Url>,
    /// API token. Overrides $XBE_TOKEN and the config file
    #[clap(long, global = true)]
    pub token: Option<String>,
    /// Don't look up or send an API token. Only valid for read commands
    #[clap(long, global = true)]
    pub no_auth: bool,
}

impl GlobalArgs {
    /// Build a client for a read-only command. If no token can be found, the
    /// request is sent unauthenticated and the server decides what's visible
    pub fn read_client(&self) -> anyhow::Result<XbeClient> {
        let config = Config::load()?;
        let base_url = self.resolve_base_url(&config)?;
        let token = if self.no_auth {
            None
        } else {
            match auth::resolve_token(&config, &base_url, self.token.as_deref())
            {
                Ok(resolved) => Some(resolved.token),
                Err(AuthError::NotFound { .. }) => {
                    info!(%base_url, "No token found, sending unauthenticated");
                    None
                }
            }
        };
        Ok(XbeClient::new(&config.http, base_url, token)?)
    }

    /// Build a client for a command that modifies data. A token is mandatory
    pub fn write_client(&self) -> anyhow::Result<XbeClient> {
        if self.no_auth {
            bail!("--no-auth can't be used with commands that modify data");
        }
        let config = Config::load()?;
        let base_url = self.resolve_base_url(&config)?;
        let resolved =
            auth::resolve_token(&config, &base_url, self.token.as_deref())
                .context("Authentication required to modify data")?;
        Ok(XbeClient::new(&config.http, base_url, Some(resolved.token))?)
    }

    /// Flag/env first, then the config file, then the default
    fn resolve_base_url(&self, config: &Config) -> anyhow::Result<Url> {
        if let Some(base_url) =
            self.base_url.as_ref().or(config.base_url.as_ref())
        {
            return Ok(base_url.clone());
        }
        DEFAULT_BASE_URL
            .parse()
            .with_context(|| format!("Invalid base URL `{DEFAULT_BASE_URL}`"))
    }
}

/// A CLI subcommand
#[derive(Clone, Debug, clap::Subcommand)]
pub enum CliCommand {
    View(ViewCommand),
    #[command(name = "do")]
    Do(DoCommand),
    Config(ConfigCommand),
    Resources(ResourcesCommand),
    Completions(CompletionsCommand),
}

impl CliCommand {
    /// Execute this CLI subcommand
    pub async fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode> {
        match self {
            Self::View(command) => command.execute(global).await,
            Self::Do(command) => command.execute(global).await,
            Self::Config(command) => command.execute(global).await,
            Self::Resources(command) => command.execute(global).await,
            Self::Completions(command) => command.execute(global).await,
        }
    }
}

/// An executable subcommand. This trait isn't strictly necessary because we do
/// static dispatch via the command enum, but it's helpful to enforce a
/// consistent interface for each subcommand.
trait Subcommand {
    /// Execute the subcommand
    async fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode>;
}
