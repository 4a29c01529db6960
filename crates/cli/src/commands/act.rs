use crate::{
    GlobalArgs, Subcommand,
    resources::{
        brokers, memberships, objectives, projects, questions, taggings, users,
    },
};
use clap::Parser;
use std::process::ExitCode;

/// Create, update and delete data on the platform. Requires a token
#[derive(Clone, Debug, Parser)]
pub struct DoCommand {
    #[command(subcommand)]
    family: DoFamily,
}

#[derive(Clone, Debug, clap::Subcommand)]
enum DoFamily {
    /// Objectives and their key results
    Objectives {
        #[command(subcommand)]
        command: objectives::Do,
    },
    /// Links between users and organizations
    Memberships {
        #[command(subcommand)]
        command: memberships::Do,
    },
    /// Construction projects
    Projects {
        #[command(subcommand)]
        command: projects::Do,
    },
    /// Platform user accounts
    Users {
        #[command(subcommand)]
        command: users::Do,
    },
    /// Broker organizations
    Brokers {
        #[command(subcommand)]
        command: brokers::Do,
    },
    /// Questions asked through the platform
    Questions {
        #[command(subcommand)]
        command: questions::Do,
    },
    /// Tags attached to resources
    Taggings {
        #[command(subcommand)]
        command: taggings::Do,
    },
}

impl Subcommand for DoCommand {
    async fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode> {
        match self.family {
            DoFamily::Objectives { command } => command.execute(&global).await,
            DoFamily::Memberships { command } => command.execute(&global).await,
            DoFamily::Projects { command } => command.execute(&global).await,
            DoFamily::Users { command } => command.execute(&global).await,
            DoFamily::Brokers { command } => command.execute(&global).await,
            DoFamily::Questions { command } => command.execute(&global).await,
            DoFamily::Taggings { command } => command.execute(&global).await,
        }?;
        Ok(ExitCode::SUCCESS)
    }
}
