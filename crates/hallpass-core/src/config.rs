//! Application configuration management.
//!
//! Configuration holds the remembered username and an optional API base URL
//! override, stored at `~/.config/hallpass/config.json`. The effective API
//! URL resolves environment variable, then config file, then the compiled
//! default.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "hallpass";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL.
const API_URL_ENV: &str = "HALLPASS_API_URL";

/// Backend used when nothing is configured.
const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Effective API base URL: environment override, then config file, then
    /// the compiled default.
    pub fn api_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Directory holding durable client state (token, theme preference,
    /// logs).
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_overrides_default() {
        let config = Config {
            api_url: Some("https://api.example.com".to_string()),
            last_username: None,
        };
        assert_eq!(config.api_url(), "https://api.example.com");
    }

    #[test]
    fn default_applies_when_nothing_is_configured() {
        let config = Config::default();
        // The environment override is absent in the test environment.
        if std::env::var(API_URL_ENV).is_err() {
            assert_eq!(config.api_url(), DEFAULT_API_URL);
        }
    }
}
