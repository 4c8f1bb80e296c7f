//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{PageRequest, PaginationState, Paginator};

// ============================================================================
// Page Path Pagination
// ============================================================================

/// Numbered pages addressed by path, `1..=total_pages`
///
/// Common patterns:
/// - `https://api.example.com/page/1`
/// - `https://api.example.com/v2/items/page/42`
#[derive(Debug, Clone)]
pub struct PagePathPaginator {
    /// Base URL, without trailing slash
    base_url: String,
    /// Number of pages to fetch
    total_pages: u32,
}

impl PagePathPaginator {
    /// Create a paginator over `1..=total_pages`
    pub fn new(base_url: impl AsRef<str>, total_pages: u32) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            total_pages,
        }
    }

    /// URL for a single page
    pub fn page_url(&self, page: u32) -> String {
        format!("{}/page/{page}", self.base_url)
    }
}

impl Paginator for PagePathPaginator {
    fn next_request(&self, state: &PaginationState) -> Option<PageRequest> {
        let next = state.page.checked_add(1)?;
        (next <= self.total_pages).then(|| PageRequest::new(next, self.page_url(next)))
    }

    fn total_pages(&self) -> Option<u32> {
        Some(self.total_pages)
    }
}
