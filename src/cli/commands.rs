//! CLI commands and argument parsing

use crate::config::Settings;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Stitch numbered JSON-array pages into one JSON array
#[derive(Parser, Debug)]
#[command(name = "page-stitch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page and write the combined array
    Fetch(FetchArgs),

    /// Print the effective settings as JSON
    ShowConfig(FetchArgs),
}

/// Overrides applied on top of the settings file
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// API base URL; pages are fetched from {base_url}/page/{n}
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token
    #[arg(long, env = "PAGE_STITCH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Number of pages to fetch
    #[arg(short, long)]
    pub pages: Option<u32>,

    /// Output file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Token bucket capacity and refill per second
    #[arg(long)]
    pub requests_per_second: Option<u32>,

    /// Retries after the first attempt
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Median delay before the first retry, in seconds
    #[arg(long)]
    pub median_first_retry_delay: Option<u64>,
}

impl FetchArgs {
    /// Apply every flag that was given
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(ref base_url) = self.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(ref token) = self.token {
            settings.bearer_token.clone_from(token);
        }
        if let Some(pages) = self.pages {
            settings.total_pages = pages;
        }
        if let Some(ref output) = self.output {
            settings.output_path.clone_from(output);
        }
        if let Some(rps) = self.requests_per_second {
            settings.rate_limiting.requests_per_second = rps;
        }
        if let Some(retries) = self.max_retries {
            settings.rate_limiting.max_retry_attempts = retries;
        }
        if let Some(delay) = self.median_first_retry_delay {
            settings.rate_limiting.median_first_retry_delay_seconds = delay;
        }
    }
}
