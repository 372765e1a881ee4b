use clap::Subcommand;

use crate::cli::config::CliConfig;
use crate::cli::utils::{api_error_message, authed_client, output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AccessCommands {
    #[command(about = "Evaluate entitlement to a feature for the current session")]
    Check {
        #[arg(help = "Feature name, e.g. quizzes or subject-browsing")]
        feature: String,
    },
}

pub async fn handle(cmd: AccessCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AccessCommands::Check { feature } => {
            let config = CliConfig::load()?;
            let url = format!("{}/api/access/{}", config.server_url(), feature);

            let response = authed_client(&config)?.get(&url).send().await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            if !status.is_success() {
                return output_error(&output_format, &api_error_message(status, &body), None);
            }

            let outcome = body
                .pointer("/data/outcome")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown");

            output_success(
                &output_format,
                &format!("{}: {}", feature, outcome),
                Some(body),
            )
        }
    }
}
