//! Engine types
//!
//! Configuration and statistics for a collation run.

use std::path::PathBuf;
use std::time::Duration;

/// Pages between progress reports; the final page is always reported
pub const PROGRESS_INTERVAL: u32 = 10;

/// A single progress checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    /// Page just written
    pub page: u32,
    /// Total pages, when known
    pub total_pages: Option<u32>,
    /// Wall-clock time since the run started
    pub elapsed: Duration,
}

/// Statistics from a collation run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Pages fetched and processed
    pub pages_fetched: u32,
    /// Element groups written to the output
    pub groups_written: usize,
    /// Pages that were empty arrays
    pub empty_pages: Vec<u32>,
    /// Pages written verbatim because they were not arrays
    pub malformed_pages: Vec<u32>,
    /// Bytes written, including brackets and separators
    pub bytes_written: u64,
    /// Progress checkpoints emitted
    pub progress: Vec<ProgressReport>,
    /// Total wall-clock time
    pub elapsed: Duration,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an empty-array page
    pub fn add_empty(&mut self, page: u32) {
        self.empty_pages.push(page);
    }

    /// Record a malformed page
    pub fn add_malformed(&mut self, page: u32) {
        self.malformed_pages.push(page);
    }
}

/// Outcome of a run written to a file
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Absolute path of the output file
    pub path: PathBuf,
    /// Size of the output file in bytes
    pub file_size: u64,
    /// Run statistics
    pub stats: RunStats,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wrote {} pages ({} bytes) to {} in {:.2?}",
            self.stats.pages_fetched,
            self.file_size,
            self.path.display(),
            self.stats.elapsed
        )
    }
}
