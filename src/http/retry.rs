//! Retry policy
//!
//! Exponential backoff with random jitter, overridden by a server-supplied
//! `Retry-After` delay when the failing response carries one.

use crate::error::Error;
use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

/// Delay used when a `Retry-After` header is present but unreadable
pub const RETRY_AFTER_FALLBACK: Duration = Duration::from_secs(5);

/// When and how long to wait between attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt
    pub max_retries: u32,
    /// Median delay before the first retry
    pub median_first_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            median_first_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry budget and first-retry median
    pub fn new(max_retries: u32, median_first_delay: Duration) -> Self {
        Self {
            max_retries,
            median_first_delay,
        }
    }

    /// Whether a failure on retry number `attempt` (1-based) may be retried
    pub fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        attempt <= self.max_retries && error.is_retryable()
    }

    /// Median backoff for retry number `attempt` (1-based), before jitter
    ///
    /// Doubles with every retry and saturates instead of overflowing.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.median_first_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
    }

    /// Backoff scaled by a uniform jitter factor in `[0.5, 1.5)`
    pub fn jittered_backoff(&self, attempt: u32) -> Duration {
        let jitter: f64 = rand::thread_rng().gen_range(0.5..1.5);
        Duration::try_from_secs_f64(self.backoff(attempt).as_secs_f64() * jitter)
            .unwrap_or(Duration::MAX)
    }

    /// Delay before retry number `attempt` following `error`
    pub fn delay_for(&self, attempt: u32, error: &Error) -> Duration {
        error
            .retry_after()
            .unwrap_or_else(|| self.jittered_backoff(attempt))
    }
}

/// Read a `Retry-After` header
///
/// Returns `None` when the header is absent, and the fallback delay when it
/// is present but neither delta-seconds nor an HTTP date.
pub fn extract_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?;
    let parsed = value
        .to_str()
        .ok()
        .and_then(|s| parse_retry_after(s, Utc::now()));
    Some(parsed.unwrap_or(RETRY_AFTER_FALLBACK))
}

/// Parse delta-seconds or an HTTP date relative to `now`
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = at.with_timezone(&Utc) - now;
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}
