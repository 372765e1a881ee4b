use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// CLI-side configuration, persisted as YAML under the user's home
/// directory (`~/.studyhall/config.yaml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub server_url: String,
    pub token: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            token: None,
        }
    }
}

impl CliConfig {
    fn path() -> anyhow::Result<PathBuf> {
        if let Ok(explicit) = std::env::var("STUDYHALL_CONFIG") {
            return Ok(PathBuf::from(explicit));
        }

        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME is not set; set STUDYHALL_CONFIG instead"))?;
        Ok(PathBuf::from(home).join(".studyhall").join("config.yaml"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        let config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Base URL, overridable per invocation via STUDYHALL_SERVER.
    pub fn server_url(&self) -> String {
        std::env::var("STUDYHALL_SERVER").unwrap_or_else(|_| self.server_url.clone())
    }
}
