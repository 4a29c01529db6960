use crate::{
    GlobalArgs, Subcommand,
    resources::{
        answer_related_contents, brokers, memberships, objectives, projects,
        questions, taggings, users,
    },
};
use clap::Parser;
use std::process::ExitCode;

/// Read data from the platform
#[derive(Clone, Debug, Parser)]
pub struct ViewCommand {
    #[command(subcommand)]
    family: ViewFamily,
}

#[derive(Clone, Debug, clap::Subcommand)]
enum ViewFamily {
    /// Objectives and their key results
    Objectives {
        #[command(subcommand)]
        command: objectives::View,
    },
    /// Links between users and organizations
    Memberships {
        #[command(subcommand)]
        command: memberships::View,
    },
    /// Construction projects
    Projects {
        #[command(subcommand)]
        command: projects::View,
    },
    /// Platform user accounts
    Users {
        #[command(subcommand)]
        command: users::View,
    },
    /// Broker organizations
    Brokers {
        #[command(subcommand)]
        command: brokers::View,
    },
    /// Questions asked through the platform
    Questions {
        #[command(subcommand)]
        command: questions::View,
    },
    /// Tags attached to resources
    Taggings {
        #[command(subcommand)]
        command: taggings::View,
    },
    /// Content related to generated answers
    AnswerRelatedContents {
        #[command(subcommand)]
        command: answer_related_contents::View,
    },
}

impl Subcommand for ViewCommand {
    async fn execute(self, global: GlobalArgs) -> anyhow::Result<ExitCode> {
        match self.family {
            ViewFamily::Objectives { command } => command.execute(&global).await,
            ViewFamily::Memberships { command } => {
                command.execute(&global).await
            }
            ViewFamily::Projects { command } => command.execute(&global).await,
            ViewFamily::Users { command } => command.execute(&global).await,
            ViewFamily::Brokers { command } => command.execute(&global).await,
            ViewFamily::Questions { command } => command.execute(&global).await,
            ViewFamily::Taggings { command } => command.execute(&global).await,
            ViewFamily::AnswerRelatedContents { command } => {
                command.execute(&global).await
            }
        }?;
        Ok(ExitCode::SUCCESS)
    }
}
