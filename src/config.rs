//! Run configuration
//!
//! Settings can come from a YAML or JSON file (chosen by extension) and are
//! then overridden by command-line flags. Field names follow the
//! PascalCase layout of the settings file:
//!
//! ```yaml
//! BaseUrl: https://api.example.com/v1
//! BearerToken: secret
//! TotalPages: 397
//! OutputPath: output.json
//! RateLimiting:
//!   RequestsPerSecond: 5
//!   MaxRetryAttempts: 5
//!   MedianFirstRetryDelaySeconds: 2
//! ```

use crate::error::{Error, Result, ResultExt};
use crate::http::{RateLimiterConfig, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Defaults
// ============================================================================

/// Default number of pages to fetch
pub const DEFAULT_TOTAL_PAGES: u32 = 397;

/// Default output file
pub const DEFAULT_OUTPUT_PATH: &str = "output.json";

fn default_total_pages() -> u32 {
    DEFAULT_TOTAL_PAGES
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_requests_per_second() -> u32 {
    5
}

fn default_max_retry_attempts() -> u32 {
    5
}

fn default_median_first_retry_delay_seconds() -> u64 {
    2
}

// ============================================================================
// Settings
// ============================================================================

/// Everything a run needs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    /// API base URL; pages live at `{BaseUrl}/page/{n}`
    #[serde(default)]
    pub base_url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub bearer_token: String,

    /// Number of pages to fetch, starting at 1
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    /// Destination file, replaced if it exists
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Rate limiting and retry options
    #[serde(default)]
    pub rate_limiting: RateLimitingOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            bearer_token: String::new(),
            total_pages: DEFAULT_TOTAL_PAGES,
            output_path: default_output_path(),
            rate_limiting: RateLimitingOptions::default(),
        }
    }
}

/// Outbound request policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RateLimitingOptions {
    /// Token bucket capacity and per-second refill
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Retries after the first attempt
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,

    /// Median backoff before the first retry
    #[serde(default = "default_median_first_retry_delay_seconds")]
    pub median_first_retry_delay_seconds: u64,
}

impl Default for RateLimitingOptions {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            max_retry_attempts: default_max_retry_attempts(),
            median_first_retry_delay_seconds: default_median_first_retry_delay_seconds(),
        }
    }
}

impl RateLimitingOptions {
    /// Token bucket whose capacity equals its per-second refill
    pub fn rate_limiter_config(&self) -> RateLimiterConfig {
        RateLimiterConfig::per_second(self.requests_per_second)
    }

    /// Retry policy for the transport
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retry_attempts,
            Duration::from_secs(self.median_first_retry_delay_seconds),
        )
    }
}

impl Settings {
    /// Load settings from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml" | "yml") => Self::from_yaml(&content),
            other => Err(Error::config(format!(
                "Unsupported settings file extension: {}",
                other.unwrap_or("(none)")
            ))),
        }
    }

    /// Parse settings from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse settings from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Check that a run can start with these settings
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("BaseUrl"));
        }
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "BaseUrl",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.bearer_token.trim().is_empty() {
            return Err(Error::missing_field("BearerToken"));
        }
        if self.total_pages == 0 {
            return Err(Error::invalid_value("TotalPages", "must be at least 1"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(Error::missing_field("OutputPath"));
        }
        if self.rate_limiting.requests_per_second == 0 {
            return Err(Error::invalid_value(
                "RateLimiting.RequestsPerSecond",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Copy with the token replaced, for display
    pub fn masked(&self) -> Self {
        let mut settings = self.clone();
        if !settings.bearer_token.is_empty() {
            settings.bearer_token = "********".to_string();
        }
        settings
    }
}
