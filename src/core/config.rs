//! Application configuration management
//!
//! Handles loading and saving application settings including:
//! - GitHub API endpoint (overridable with `REPOSCOPE_API_URL`)
//! - Per-call timeout and page size
//! - Search history size

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ReposcopeError, Result};

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "REPOSCOPE_API_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_base_url: String,

    /// Upper bound on each API call, in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Page size for list endpoints
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// Maximum number of search history entries kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_per_page() -> u8 {
    100
}

fn default_history_limit() -> usize {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            request_timeout_secs: default_timeout(),
            per_page: default_per_page(),
            history_limit: default_history_limit(),
        }
    }
}

/// Configuration keys settable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigKey {
    /// GitHub API base URL
    ApiUrl,
    /// Per-call timeout in seconds
    Timeout,
    /// Page size for list endpoints (1-100)
    PerPage,
    /// Number of search history entries kept
    HistoryLimit,
}

impl Config {
    /// Load configuration from file, or create default if not exists
    ///
    /// `REPOSCOPE_API_URL` takes precedence over the stored endpoint.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory holding history and bookmarks
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "reposcope", "reposcope")
            .ok_or_else(|| ReposcopeError::Config("Could not determine config directory".into()))
    }

    /// Parsed and validated API base URL
    pub fn api_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            ReposcopeError::Config(format!("Invalid API URL '{}': {}", self.api_base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ReposcopeError::Config(format!(
                "API URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }

        Ok(url)
    }

    /// Per-call timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Set a value from its string form
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::ApiUrl => {
                let previous = std::mem::replace(&mut self.api_base_url, value.to_string());
                if let Err(e) = self.api_url() {
                    self.api_base_url = previous;
                    return Err(e);
                }
            }
            ConfigKey::Timeout => {
                self.request_timeout_secs = parse_number(value, 1, 300)?;
            }
            ConfigKey::PerPage => {
                self.per_page = parse_number::<u8>(value, 1, 100)?;
            }
            ConfigKey::HistoryLimit => {
                self.history_limit = parse_number(value, 1, 1000)?;
            }
        }
        Ok(())
    }

    /// Get a value in its string form
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::ApiUrl => self.api_base_url.clone(),
            ConfigKey::Timeout => self.request_timeout_secs.to_string(),
            ConfigKey::PerPage => self.per_page.to_string(),
            ConfigKey::HistoryLimit => self.history_limit.to_string(),
        }
    }

    /// Restore a single key to its default
    pub fn reset(&mut self, key: ConfigKey) {
        let defaults = Config::default();
        match key {
            ConfigKey::ApiUrl => self.api_base_url = defaults.api_base_url,
            ConfigKey::Timeout => self.request_timeout_secs = defaults.request_timeout_secs,
            ConfigKey::PerPage => self.per_page = defaults.per_page,
            ConfigKey::HistoryLimit => self.history_limit = defaults.history_limit,
        }
    }
}

fn parse_number<T>(value: &str, min: T, max: T) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let parsed: T = value
        .parse()
        .map_err(|_| ReposcopeError::InvalidInput(format!("'{}' is not a number", value)))?;
    if parsed < min || parsed > max {
        return Err(ReposcopeError::InvalidInput(format!(
            "Value must be between {} and {}",
            min, max
        )));
    }
    Ok(parsed)
}
