//! Execution engine module
//!
//! Main page loop: fetch, classify, write, report.
//!
//! # Overview
//!
//! The engine module provides:
//! - `Collator` - Drives the sequential fetch-then-write loop
//! - `RunStats` / `RunSummary` - What a run produced

mod types;

pub use types::{ProgressReport, RunStats, RunSummary, PROGRESS_INTERVAL};

use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::output::{JsonArrayWriter, PageContent};
use crate::pagination::{PaginationState, Paginator};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Stitches every page into one JSON array
///
/// Pages are fetched strictly one at a time; page N+1 is not requested
/// until page N has been written and flushed. The first unrecoverable fetch
/// or write failure aborts the run and leaves the sink without its closing
/// bracket.
pub struct Collator {
    fetcher: PageFetcher,
    paginator: Box<dyn Paginator>,
}

impl Collator {
    /// Create a new collator
    pub fn new(fetcher: PageFetcher, paginator: Box<dyn Paginator>) -> Self {
        Self { fetcher, paginator }
    }

    /// Run into a file, replacing anything already at `path`
    pub async fn run_to_file(&self, path: impl AsRef<Path>) -> Result<RunSummary> {
        let path = path.as_ref();
        let writer = JsonArrayWriter::create(path)?;
        let (_, stats) = self.run(writer).await?;

        let path = std::path::absolute(path)?;
        let file_size = std::fs::metadata(&path)?.len();
        Ok(RunSummary {
            path,
            file_size,
            stats,
        })
    }

    /// Run into an already opened writer and close the array
    pub async fn run<W: Write>(&self, mut writer: JsonArrayWriter<W>) -> Result<(W, RunStats)> {
        let start = Instant::now();
        let total_pages = self.paginator.total_pages();
        let mut state = PaginationState::new();
        let mut stats = RunStats::new();

        info!(total_pages = ?total_pages, "Starting collation");

        while let Some(request) = self.paginator.next_request(&state) {
            let page = request.page;
            let body = match self.fetcher.fetch(&request).await {
                Ok(body) => body,
                Err(e) => return Err(abort(page, e)),
            };

            let content = match writer.write_page(&body) {
                Ok(content) => content,
                Err(e) => return Err(abort(page, e)),
            };
            match content {
                PageContent::Elements(_) => {}
                PageContent::Empty => {
                    warn!(page, "Page is an empty array; nothing written");
                    stats.add_empty(page);
                }
                PageContent::Malformed(_) => {
                    warn!(
                        page,
                        bytes = body.len(),
                        "Page is not a JSON array; writing body verbatim"
                    );
                    stats.add_malformed(page);
                }
            }

            state.complete(page);
            stats.pages_fetched += 1;

            if is_checkpoint(page, total_pages) {
                let report = ProgressReport {
                    page,
                    total_pages,
                    elapsed: start.elapsed(),
                };
                info!(
                    page,
                    total_pages = ?total_pages,
                    bytes = writer.bytes_written(),
                    "Progress: page {} done after {:.1?}",
                    page,
                    report.elapsed
                );
                stats.progress.push(report);
            }
        }

        stats.groups_written = writer.groups_written();
        let (sink, bytes_written) = writer.finish()?;
        stats.bytes_written = bytes_written;
        stats.elapsed = start.elapsed();

        info!(
            pages = stats.pages_fetched,
            empty = stats.empty_pages.len(),
            malformed = stats.malformed_pages.len(),
            "Collation finished in {:.2?}",
            stats.elapsed
        );
        Ok((sink, stats))
    }
}

fn is_checkpoint(page: u32, total_pages: Option<u32>) -> bool {
    page % PROGRESS_INTERVAL == 0 || total_pages == Some(page)
}

/// Log and wrap the failure that ends a run at `page`
fn abort(page: u32, e: Error) -> Error {
    error!(page, error = %e, "Aborting run; output left incomplete");
    Error::page_failed(page, e)
}

impl std::fmt::Debug for Collator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collator")
            .field("fetcher", &self.fetcher)
            .field("total_pages", &self.paginator.total_pages())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
