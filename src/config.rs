//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL override and the last used username.
//!
//! Configuration is stored at `~/.config/meetctl/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/state directory paths
const APP_NAME: &str = "meetctl";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "MEETCTL_API_URL";

/// Default API endpoint when neither the environment nor the config file
/// provides one
const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
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

    /// Resolve the API base URL once at startup. Precedence: environment
    /// variable, then config file, then the built-in default.
    pub fn api_base_url(&self) -> String {
        Self::resolve_base_url(std::env::var(API_URL_ENV).ok(), self.api_base_url.as_deref())
    }

    /// Trailing slashes are stripped so path joining stays predictable.
    fn resolve_base_url(env_override: Option<String>, configured: Option<&str>) -> String {
        let url = env_override
            .filter(|v| !v.is_empty())
            .or_else(|| configured.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        url.trim_end_matches('/').to_string()
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the session file
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn falls_back_to_default_url() {
        assert_eq!(
            Config::resolve_base_url(None, None),
            "http://localhost:8000/api"
        );
    }

    #[test]
    fn config_file_value_beats_default() {
        // Trailing slash stripped
        assert_eq!(
            Config::resolve_base_url(None, Some("https://meetings.example.com/api/")),
            "https://meetings.example.com/api"
        );
    }

    #[test]
    fn env_override_beats_config_file() {
        assert_eq!(
            Config::resolve_base_url(
                Some("http://127.0.0.1:9000/api".to_string()),
                Some("https://meetings.example.com/api"),
            ),
            "http://127.0.0.1:9000/api"
        );
    }

    #[test]
    fn empty_env_override_is_ignored() {
        assert_eq!(
            Config::resolve_base_url(Some(String::new()), Some("https://meetings.example.com/api")),
            "https://meetings.example.com/api"
        );
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config {
            api_base_url: Some("http://localhost:8000/api".to_string()),
            last_username: Some("alice".to_string()),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.api_base_url, config.api_base_url);
        assert_eq!(back.last_username, Some("alice".to_string()));
    }
}
