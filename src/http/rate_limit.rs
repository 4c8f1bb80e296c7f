//! Rate limiting implementation
//!
//! Uses the governor crate for token bucket rate limiting. Waiters are
//! admitted oldest-first through a fair mutex, and the number of waiters is
//! bounded so a stalled bucket fails fast instead of queueing forever.

use crate::error::{Error, Result};
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::debug;

/// Configuration for rate limiting
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
    /// Maximum number of requests allowed to wait for a token
    pub queue_limit: usize,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 5,
            burst_size: 5,
            queue_limit: 500,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
            ..Default::default()
        }
    }

    /// Bucket whose capacity equals its per-second refill
    pub fn per_second(requests_per_second: u32) -> Self {
        Self::new(requests_per_second, requests_per_second)
    }
}

/// Token bucket rate limiter
///
/// Cloning shares the bucket, so every clone draws from the same tokens.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
    queue: Arc<Semaphore>,
    turn: Arc<Mutex<()>>,
    queue_limit: usize,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rate).allow_burst(burst);
        let queue_limit = config.queue_limit.max(1);

        Self {
            limiter: Arc::new(Governor::direct(quota)),
            queue: Arc::new(Semaphore::new(queue_limit)),
            turn: Arc::new(Mutex::new(())),
            queue_limit,
        }
    }

    /// Wait for a token, in arrival order
    ///
    /// Fails with [`Error::QueueFull`] when `queue_limit` callers are already
    /// waiting.
    pub async fn acquire(&self) -> Result<()> {
        let Ok(_slot) = self.queue.try_acquire() else {
            debug!(queue_limit = self.queue_limit, "Rate limiter queue full");
            return Err(Error::QueueFull {
                capacity: self.queue_limit,
            });
        };

        // tokio's Mutex hands out the lock in FIFO order
        let _turn = self.turn.lock().await;
        self.limiter.until_ready().await;
        Ok(())
    }

    /// Number of callers currently queued in [`RateLimiter::acquire`]
    pub fn waiting(&self) -> usize {
        self.queue_limit - self.queue.available_permits()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimiterConfig::default())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("queue_limit", &self.queue_limit)
            .field("waiting", &self.waiting())
            .finish_non_exhaustive()
    }
}
