//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

/// One page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index
    pub page: u32,
    /// Fully resolved URL for this page
    pub url: String,
}

impl PageRequest {
    /// Create a page request
    pub fn new(page: u32, url: impl Into<String>) -> Self {
        Self {
            page,
            url: url.into(),
        }
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Last page fully processed (0 before the first page)
    pub page: u32,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `page` has been processed
    pub fn complete(&mut self, page: u32) {
        self.page = page;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Request to issue after `state`, or `None` when done
    fn next_request(&self, state: &PaginationState) -> Option<PageRequest>;

    /// Total number of pages, when known up front
    fn total_pages(&self) -> Option<u32> {
        None
    }
}
