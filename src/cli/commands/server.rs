use clap::Subcommand;

use crate::cli::config::CliConfig;
use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check API liveness and database connectivity")]
    Health,
    #[command(about = "Show or set the server URL used by the CLI")]
    Url {
        #[arg(help = "New server URL to store")]
        url: Option<String>,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health => {
            let config = CliConfig::load()?;
            let url = format!("{}/health", config.server_url());

            let response = reqwest::get(&url).await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            if status.is_success() {
                output_success(&output_format, "Server is healthy", Some(body))
            } else {
                output_error(
                    &output_format,
                    &format!("Server degraded ({})", status),
                    Some("DEGRADED"),
                )
            }
        }
        ServerCommands::Url { url } => {
            let mut config = CliConfig::load()?;

            match url {
                Some(url) => {
                    config.server_url = url.clone();
                    config.save()?;
                    output_success(&output_format, &format!("Server URL set to {}", url), None)
                }
                None => output_success(
                    &output_format,
                    &config.server_url(),
                    None,
                ),
            }
        }
    }
}
