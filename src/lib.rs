//! # page-stitch
//!
//! Fetches a fixed run of numbered pages from a paginated HTTP API, each
//! returning a JSON array, and streams their elements into one top-level
//! JSON array on disk. Memory stays flat: only one page is resident at a time.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use page_stitch::engine::Collator;
//! use page_stitch::fetch::PageFetcher;
//! use page_stitch::http::{HttpClient, HttpClientConfig};
//! use page_stitch::pagination::PagePathPaginator;
//!
//! #[tokio::main]
//! async fn main() -> page_stitch::Result<()> {
//!     let client = HttpClient::with_config(HttpClientConfig::default())?;
//!     let fetcher = PageFetcher::new(client, "token");
//!     let paginator = PagePathPaginator::new("https://api.example.com", 397);
//!
//!     let summary = Collator::new(fetcher, Box::new(paginator))
//!         .run_to_file("output.json")
//!         .await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────────────────┐   ┌──────────┐
//! │  Paginator   │──▶│ PageFetcher │──▶│ HttpClient               │──▶│   API    │
//! │ /page/{n}    │   │ Bearer auth │   │ RateLimiter + RetryPolicy│   │          │
//! └──────────────┘   └─────────────┘   └──────────────────────────┘   └──────────┘
//!        ▲                  │ raw body
//!        │                  ▼
//! ┌──────┴───────────────────────────┐
//! │ Collator → JsonArrayWriter → file│
//! └──────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Settings file and defaults
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Page fetcher
pub mod fetch;

/// JSON array output
pub mod output;

/// Main collation loop
pub mod engine;

/// Cooperative shutdown
pub mod shutdown;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
