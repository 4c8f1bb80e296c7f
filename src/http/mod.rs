//! HTTP client module
//!
//! Provides the rate-limited, retrying transport every page request goes through.
//!
//! # Features
//!
//! - **Rate Limiting**: Token bucket rate limiter using governor, with a bounded FIFO wait queue
//! - **Automatic Retries**: 408/429/5xx and network failures, jittered exponential backoff
//! - **Retry-After**: Server-supplied delays override the computed backoff
//! - **Cancellation**: Waits and in-flight requests abort on shutdown

mod client;
mod rate_limit;
mod retry;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::{extract_retry_after, parse_retry_after, RetryPolicy, RETRY_AFTER_FALLBACK};
