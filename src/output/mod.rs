//! Output module
//!
//! Assembles the single top-level JSON array on disk.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Classifying a page body as an array, an empty array, or anything else
//! - Writing element groups into one array with correct comma placement
//! - Flushing after each group so partial progress is durable

mod classify;
mod writer;

pub use classify::{classify, PageContent};
pub use writer::{JsonArrayWriter, DEFAULT_BUFFER_SIZE};
