use serde_json::Value;

use crate::cli::config::CliConfig;
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = serde_json::json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = serde_json::json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = serde_json::json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Build an HTTP client with the stored bearer token, when one exists.
pub fn authed_client(config: &CliConfig) -> anyhow::Result<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    if let Some(token) = &config.token {
        let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| anyhow::anyhow!("Stored token is not a valid header value"))?;
        headers.insert(reqwest::header::AUTHORIZATION, value);
    }

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

/// Extract the API's error message from a response body, falling back to
/// the HTTP status.
pub fn api_error_message(status: reqwest::StatusCode, body: &Value) -> String {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}
