pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "studyhall")]
#[command(about = "StudyHall CLI - Command-line interface for the learning portal API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Server status")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Entitlement checks")]
    Access {
        #[command(subcommand)]
        cmd: commands::access::AccessCommands,
    },

    #[command(about = "Subscription management")]
    Subscription {
        #[command(subcommand)]
        cmd: commands::subscription::SubscriptionCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
        Commands::Access { cmd } => commands::access::handle(cmd, output_format).await,
        Commands::Subscription { cmd } => commands::subscription::handle(cmd, output_format).await,
    }
}
