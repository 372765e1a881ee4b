use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliConfig;
use crate::cli::utils::{api_error_message, authed_client, output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum SubscriptionCommands {
    #[command(about = "List your subscriptions")]
    List,

    #[command(about = "Subscribe to a subject")]
    Create {
        #[arg(help = "Subject identifier, e.g. BST")]
        subject: String,
        #[arg(long, help = "Subscribe at the premium tier (365-day term)")]
        premium: bool,
    },
}

pub async fn handle(cmd: SubscriptionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SubscriptionCommands::List => {
            let config = CliConfig::load()?;
            let url = format!("{}/api/subscriptions", config.server_url());

            let response = authed_client(&config)?.get(&url).send().await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            if !status.is_success() {
                return output_error(&output_format, &api_error_message(status, &body), None);
            }

            output_success(&output_format, "Subscriptions", Some(body))
        }
        SubscriptionCommands::Create { subject, premium } => {
            let config = CliConfig::load()?;
            let url = format!("{}/api/subscriptions", config.server_url());

            let tier = if premium { "premium" } else { "free" };
            let response = authed_client(&config)?
                .post(&url)
                .json(&json!({ "subject_id": subject, "tier": tier }))
                .send()
                .await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            if !status.is_success() {
                return output_error(&output_format, &api_error_message(status, &body), None);
            }

            output_success(
                &output_format,
                &format!("Subscribed to {} ({})", subject, tier),
                Some(body),
            )
        }
    }
}
