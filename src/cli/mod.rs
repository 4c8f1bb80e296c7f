//! CLI module
//!
//! Command-line interface for running a collation.
//!
//! # Commands
//!
//! - `fetch` - Fetch every page and write the combined array
//! - `show-config` - Print the effective settings (token masked)

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchArgs};
pub use runner::Runner;
