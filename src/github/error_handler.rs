//! GitHub API failure classification
//!
//! Every failed call is first normalised into a [`FailureDescriptor`] at the
//! transport boundary, then [`classify_failure`] maps it to one of five
//! [`ErrorKind`]s. The classifier is a pure function so its precedence can be
//! tested without any HTTP client in the loop.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Category of a failed GitHub call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 404
    NotFound,
    /// HTTP 403 whose message mentions the rate limit
    RateLimited,
    /// HTTP 403 for any other reason (private repository, missing scope)
    PrivateOrForbidden,
    /// No response was received (connection failure, timeout)
    Network,
    /// Anything else
    Unknown,
}

impl ErrorKind {
    /// Friendly copy for each kind.
    ///
    /// Consumers may render the raw [`GitHubError`] message instead; this is
    /// the default mapping used by the CLI.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "Repository not found. Please check the URL and try again.",
            ErrorKind::RateLimited => {
                "Rate limit exceeded. Please try again later or use a GitHub token."
            }
            ErrorKind::PrivateOrForbidden => {
                "This repository is private. Please use a GitHub token with proper permissions."
            }
            ErrorKind::Network => "Network error occurred. Please check your internet connection.",
            ErrorKind::Unknown => "An unexpected error occurred. Please try again later.",
        }
    }

    /// Short machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::PrivateOrForbidden => "private_or_forbidden",
            ErrorKind::Network => "network",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified GitHub failure: kind plus human-readable message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GitHubError {
    /// Classification
    pub kind: ErrorKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Descriptive message, prefixed with the failed action
    pub message: String,
}

impl GitHubError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self.kind {
            ErrorKind::Network => true,
            ErrorKind::Unknown => self.status.is_some_and(|s| s >= 500),
            _ => false,
        }
    }
}

/// Normalised view of a failed call, built where the transport hands back control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureDescriptor {
    /// An HTTP response arrived
    pub has_response: bool,
    /// Response status
    pub status: Option<u16>,
    /// Raw response body
    pub body: Option<String>,
    /// The request left the client
    pub has_request: bool,
    /// Transport-level detail (error text when there is no response)
    pub detail: String,
}

impl FailureDescriptor {
    /// A non-2xx response was received
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self {
            has_response: true,
            status: Some(status),
            body: Some(body.into()),
            has_request: true,
            detail: String::new(),
        }
    }

    /// A 2xx response whose body could not be decoded
    pub fn undecodable(status: u16, detail: impl Into<String>) -> Self {
        Self {
            has_response: true,
            status: Some(status),
            body: None,
            has_request: true,
            detail: detail.into(),
        }
    }

    /// The request was sent but nothing came back
    pub fn no_response(detail: impl Into<String>) -> Self {
        Self {
            has_request: true,
            detail: detail.into(),
            ..Self::default()
        }
    }

    /// The call failed before anything was transmitted
    pub fn not_sent(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extract the `message` field GitHub puts in error bodies
fn upstream_message(body: Option<&str>) -> Option<String> {
    let body = body?;
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// Check if a 403 message is a rate-limit rejection
fn is_rate_limit_message(message: &str) -> bool {
    message.to_lowercase().contains("rate limit")
}

/// Classify a failed call made while performing `action`
///
/// Precedence:
/// 1. request sent, no response → `Network`
/// 2. 404 → `NotFound`
/// 3. 403 with a rate-limit message → `RateLimited`, otherwise `PrivateOrForbidden`
/// 4. any other status → `Unknown`, using the upstream message when present
/// 5. nothing sent → `Unknown` with the raw detail
pub fn classify_failure(failure: &FailureDescriptor, action: &str) -> GitHubError {
    if !failure.has_response {
        if failure.has_request {
            return GitHubError {
                kind: ErrorKind::Network,
                status: None,
                message: format!(
                    "Error {}: No response received. Check your network connection. ({})",
                    action, failure.detail
                ),
            };
        }
        return GitHubError {
            kind: ErrorKind::Unknown,
            status: None,
            message: format!("Error {}: {}", action, failure.detail),
        };
    }

    let status = failure.status.unwrap_or_default();
    let upstream = upstream_message(failure.body.as_deref());
    let detail = upstream
        .clone()
        .or_else(|| (!failure.detail.is_empty()).then(|| failure.detail.clone()))
        .unwrap_or_else(|| "Unknown error".to_string());

    let (kind, message) = match status {
        404 => (
            ErrorKind::NotFound,
            format!("Error {}: 404 - resource not found ({})", action, detail),
        ),
        403 if upstream.as_deref().is_some_and(is_rate_limit_message) => (
            ErrorKind::RateLimited,
            format!("Error {}: 403 - rate limit exceeded ({})", action, detail),
        ),
        403 => (
            ErrorKind::PrivateOrForbidden,
            format!("Error {}: 403 - access forbidden ({})", action, detail),
        ),
        _ => (
            ErrorKind::Unknown,
            format!("Error {}: {} - {}", action, status, detail),
        ),
    };

    GitHubError {
        kind,
        status: Some(status),
        message,
    }
}
