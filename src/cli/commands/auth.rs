use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliConfig;
use crate::cli::utils::{api_error_message, authed_client, output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account and store the session token")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Login and store the session token")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Forget the stored session token")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { name, email, password } => {
            let mut config = CliConfig::load()?;
            let url = format!("{}/auth/register", config.server_url());

            let response = reqwest::Client::new()
                .post(&url)
                .json(&json!({ "name": name, "email": email, "password": password }))
                .send()
                .await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            if !status.is_success() {
                return output_error(&output_format, &api_error_message(status, &body), None);
            }

            store_token(&mut config, &body)?;
            output_success(&output_format, &format!("Registered {}", email), Some(body))
        }
        AuthCommands::Login { email, password } => {
            let mut config = CliConfig::load()?;
            let url = format!("{}/auth/login", config.server_url());

            let response = reqwest::Client::new()
                .post(&url)
                .json(&json!({ "email": email, "password": password }))
                .send()
                .await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            if !status.is_success() {
                return output_error(&output_format, &api_error_message(status, &body), None);
            }

            store_token(&mut config, &body)?;
            output_success(&output_format, &format!("Logged in as {}", email), Some(body))
        }
        AuthCommands::Logout => {
            let mut config = CliConfig::load()?;
            config.token = None;
            config.save()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            let config = CliConfig::load()?;
            let url = format!("{}/api/auth/whoami", config.server_url());

            let response = authed_client(&config)?.get(&url).send().await?;
            let status = response.status();
            let body: serde_json::Value = response.json().await?;

            if !status.is_success() {
                return output_error(&output_format, &api_error_message(status, &body), None);
            }

            output_success(&output_format, "Current session", Some(body))
        }
    }
}

fn store_token(config: &mut CliConfig, body: &serde_json::Value) -> anyhow::Result<()> {
    if let Some(token) = body
        .pointer("/data/token")
        .and_then(serde_json::Value::as_str)
    {
        config.token = Some(token.to_string());
        config.save()?;
    }
    Ok(())
}
