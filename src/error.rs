//! Custom error types for reposcope
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

use crate::github::error_handler::GitHubError;

/// Main error type for the reposcope application
#[derive(Error, Debug)]
pub enum ReposcopeError {
    /// Input could not be resolved to an owner/repository pair
    #[error("Invalid repository: {0}\n\n  → Expected https://github.com/owner/repo, github.com/owner/repo or owner/repo")]
    InvalidRepository(String),

    /// GitHub API call failed (already classified)
    #[error("{0}")]
    GitHub(#[from] GitHubError),

    /// Credential storage error
    #[error("Cannot access secure storage: {0}\n\n  → On macOS: Make sure Keychain Access is available.\n  → On Linux: Ensure a secret service (like gnome-keyring) is running.\n  → Or export GITHUB_TOKEN for a session-only token.")]
    Credential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse data: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),
}

impl From<keyring::Error> for ReposcopeError {
    fn from(err: keyring::Error) -> Self {
        ReposcopeError::Credential(err.to_string())
    }
}

impl From<toml::de::Error> for ReposcopeError {
    fn from(err: toml::de::Error) -> Self {
        ReposcopeError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ReposcopeError {
    fn from(err: toml::ser::Error) -> Self {
        ReposcopeError::Toml(err.to_string())
    }
}

/// Result type alias using ReposcopeError
pub type Result<T> = std::result::Result<T, ReposcopeError>;
