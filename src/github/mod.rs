//! GitHub API integration module
//!
//! This module provides all GitHub-related functionality:
//! - Credential-aware client construction
//! - Rate limit observation
//! - Repository data operations
//! - Error classification
//! - Optional retry wrapper

pub mod client;
pub mod error_handler;
pub mod gateway;
pub mod provider;
pub mod rate_limit;
pub mod retry;
pub mod types;

pub use client::{request_headers, GitHubClient};
pub use error_handler::{classify_failure, ErrorKind, FailureDescriptor, GitHubError};
pub use gateway::{GatewayResult, ItemState, RepositoryHandler};
pub use provider::ClientProvider;
pub use rate_limit::{RateLimitObserver, RateLimitSnapshot};
pub use retry::{with_retry, RetryConfig};
pub use types::{
    CommitActivity, Commit, Contributor, Issue, LanguageMap, PullRequest, Release, Repository,
    WeeklyActivity,
};
