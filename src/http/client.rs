//! HTTP client with retry and rate limiting
//!
//! Provides an HTTP client that handles:
//! - Token-bucket admission before every attempt
//! - Automatic retries with jittered exponential backoff
//! - `Retry-After` overrides on failing responses
//! - Cooperative cancellation of waits and in-flight requests

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::retry::{extract_retry_after, RetryPolicy};
use crate::error::{Error, Result};
use crate::shutdown::ShutdownSignal;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Retry policy
    pub retry: RetryPolicy,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            retry: RetryPolicy::default(),
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Request headers, one value per name
    pub headers: HashMap<String, String>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any earlier value for the same name
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
    shutdown: Option<ShutdownSignal>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    ///
    /// A limiter is built from `config.rate_limit` and shared by every
    /// request this client sends.
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
            shutdown: None,
        })
    }

    /// Abort waits and in-flight requests when `signal` fires
    #[must_use]
    pub fn with_shutdown(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = Some(signal);
        self
    }

    /// Make a GET request and read the whole body as text
    ///
    /// Only 2xx responses are read; any other final status becomes
    /// [`Error::HttpStatus`].
    pub async fn get_text(&self, url: &str, config: RequestConfig) -> Result<String> {
        let response = self.request(url, &config).await?;
        self.cancellable(async move { response.text().await.map_err(Error::Http) })
            .await
    }

    /// Send a GET, retrying transient failures per the retry policy
    async fn request(&self, url: &str, config: &RequestConfig) -> Result<Response> {
        let policy = &self.config.retry;

        let mut attempt = 0;
        loop {
            let error = match self.cancellable(self.send_once(url, config)).await {
                Ok(response) => {
                    debug!(url, attempt, "Request succeeded");
                    return Ok(response);
                }
                Err(e) => e,
            };

            attempt += 1;
            if !policy.should_retry(&error, attempt) {
                return Err(error);
            }

            let delay = policy.delay_for(attempt, &error);
            warn!(
                "Request GET {} failed ({}), retry {}/{} in {:?}",
                url, error, attempt, policy.max_retries, delay
            );
            self.cancellable(async {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .await?;
        }
    }

    /// One admission plus one attempt, with no retries
    async fn send_once(&self, url: &str, config: &RequestConfig) -> Result<Response> {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.acquire().await?;
        }

        let mut req = self.client.get(url);
        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let timeout = self.config.timeout;
        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = extract_retry_after(response.headers());
        let body = response.text().await.unwrap_or_default();
        Err(Error::HttpStatus {
            status: status.as_u16(),
            body,
            retry_after,
        })
    }

    /// Race `fut` against the shutdown signal, if one is installed
    async fn cancellable<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match &self.shutdown {
            Some(signal) => {
                tokio::select! {
                    biased;
                    () = signal.cancelled() => Err(Error::Cancelled),
                    result = fut => result,
                }
            }
            None => fut.await,
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.config.timeout)
            .field("retry", &self.config.retry)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .field("has_shutdown", &self.shutdown.is_some())
            .finish_non_exhaustive()
    }
}
