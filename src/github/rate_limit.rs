//! Rate limit observation
//!
//! Reads `x-ratelimit-*` headers off successful responses and remembers the
//! latest values. Purely diagnostic: nothing here delays or blocks a request.

use std::sync::RwLock;

use chrono::{DateTime, Local, TimeZone, Utc};
use reqwest::header::HeaderMap;
use serde::Serialize;

/// Remaining quota below which a warning is logged
pub const LOW_WATER_MARK: u64 = 100;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const LIMIT_HEADER: &str = "x-ratelimit-limit";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota state from the most recent successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitSnapshot {
    pub remaining: u64,
    pub limit: u64,
    /// Unix seconds at which the window resets
    pub reset: i64,
}

impl RateLimitSnapshot {
    /// Parse from response headers; `None` unless all three are present and numeric
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            remaining: header_number(headers, REMAINING_HEADER)?,
            limit: header_number(headers, LIMIT_HEADER)?,
            reset: header_number(headers, RESET_HEADER)?,
        })
    }

    /// Reset time as a timestamp
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.reset, 0).single()
    }

    /// Whether the quota is under the low-water mark
    pub fn is_low(&self) -> bool {
        self.remaining < LOW_WATER_MARK
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Keeps the latest [`RateLimitSnapshot`]; no history
#[derive(Debug, Default)]
pub struct RateLimitObserver {
    latest: RwLock<Option<RateLimitSnapshot>>,
}

impl RateLimitObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the quota carried by a successful response
    ///
    /// Never fails. Responses without complete headers leave the previous
    /// snapshot in place.
    pub fn observe(&self, headers: &HeaderMap) {
        let Some(snapshot) = RateLimitSnapshot::from_headers(headers) else {
            tracing::trace!("Response carried no rate limit headers");
            return;
        };

        let reset = snapshot
            .reset_at()
            .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| snapshot.reset.to_string());

        tracing::debug!(
            "Rate limit: {}/{} remaining (resets at {})",
            snapshot.remaining,
            snapshot.limit,
            reset
        );

        if snapshot.is_low() {
            tracing::warn!(
                remaining = snapshot.remaining,
                limit = snapshot.limit,
                "Rate limit getting low, resets at {}",
                reset
            );
        }

        if let Ok(mut latest) = self.latest.write() {
            *latest = Some(snapshot);
        }
    }

    /// Most recent snapshot, if any call has succeeded yet
    pub fn latest(&self) -> Option<RateLimitSnapshot> {
        self.latest.read().ok().and_then(|s| *s)
    }
}
