use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

use crate::conversation::GREETING;
use crate::theme::Theme;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";
pub const DEFAULT_PATH: &str = "/api/chat";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the completion service
    pub endpoint: String,
    /// Relative path the conversation is POSTed to
    pub path: String,
    pub greeting: String,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            path: DEFAULT_PATH.to_string(),
            greeting: GREETING.to_string(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config directory, falling back to defaults when
    /// no file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Full URL of the completion endpoint
    pub fn chat_url(&self) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chatview").join("config.json"))
    }

    pub fn default_log_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("chatview").join("chatview.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.chat_url(), "http://localhost:3000/api/chat");
        assert_eq!(config.greeting, GREETING);
    }

    #[test]
    fn test_chat_url_joins_without_doubled_slash() {
        let config = Config {
            endpoint: "https://chat.example.com/".to_string(),
            path: "/api/chat".to_string(),
            ..Config::default()
        };
        assert_eq!(config.chat_url(), "https://chat.example.com/api/chat");

        let config = Config {
            endpoint: "https://chat.example.com".to_string(),
            path: "v1/reply".to_string(),
            ..Config::default()
        };
        assert_eq!(config.chat_url(), "https://chat.example.com/v1/reply");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r##"{"endpoint": "http://10.0.0.2:8080", "theme": {"assistant": "#336699"}}"##,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.endpoint, "http://10.0.0.2:8080");
        assert_eq!(config.path, DEFAULT_PATH);
        assert_eq!(config.theme.assistant, ratatui::style::Color::Rgb(0x33, 0x66, 0x99));
        assert_eq!(config.theme.user, Theme::default().user);
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            greeting: "Welcome back".to_string(),
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
