//! Opt-in retry wrapper for gateway calls
//!
//! Gateway operations never retry on their own. Callers that want to ride out
//! a flaky connection wrap a call in [`with_retry`]; only transient failures
//! (network errors and 5xx responses) are retried.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::github::error_handler::GitHubError;

/// Configuration for retry operations
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Delay before the first retry
    pub min_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Total attempts, including the first one
    pub max_attempts: usize,
    /// Whether to add jitter to delays
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            max_attempts: 3,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn new(min_delay: Duration, max_attempts: usize) -> Self {
        Self {
            min_delay,
            max_attempts,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.with_jitter = jitter;
        self
    }

    /// Build an exponential backoff strategy from this configuration
    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1));

        if self.with_jitter {
            builder = builder.with_jitter();
        }

        builder
    }
}

/// Run `operation`, retrying transient GitHub failures
///
/// The last error is returned once attempts run out; permanent failures
/// (not found, forbidden, rate limited) are returned immediately.
pub async fn with_retry<T, F, Fut>(operation: F, config: RetryConfig) -> Result<T, GitHubError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GitHubError>>,
{
    operation
        .retry(config.into_backoff())
        .when(GitHubError::is_transient)
        .notify(|err, dur| {
            tracing::debug!("Retrying in {:?} after {}: {}", dur, err.kind, err.message);
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::error_handler::ErrorKind;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn failure(kind: ErrorKind, status: Option<u16>) -> GitHubError {
        GitHubError {
            kind,
            status,
            message: "boom".into(),
        }
    }

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.min_delay, Duration::from_secs(1));
        assert_eq!(config.max_attempts, 3);
        assert!(config.with_jitter);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_network_errors_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = with_retry(
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(failure(ErrorKind::Network, None))
                    } else {
                        Ok(42)
                    }
                }
            },
            RetryConfig::default().with_jitter(false),
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> = with_retry(
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(failure(ErrorKind::Unknown, Some(502)))
                }
            },
            RetryConfig::new(Duration::from_millis(10), 3),
        )
        .await;

        assert_eq!(result.unwrap_err().status, Some(502));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> = with_retry(
            move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(failure(ErrorKind::NotFound, Some(404)))
                }
            },
            RetryConfig::default(),
        )
        .await;

        assert_eq!(result.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
