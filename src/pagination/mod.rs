//! Pagination module
//!
//! Supports: fixed-count numbered pages (`{base}/page/{n}`)
//!
//! # Overview
//!
//! A [`Paginator`] turns the state of the run so far into the next request
//! to issue, or `None` when the sequence is exhausted. The engine owns the
//! state and advances it only after a page has been fully written, so
//! requests are strictly sequential with no gaps or repeats.

mod strategies;
mod types;

pub use strategies::PagePathPaginator;
pub use types::{PageRequest, PaginationState, Paginator};
