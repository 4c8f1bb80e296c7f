//! Streaming JSON array writer
//!
//! Writes `[`, then element groups separated by commas, then `]`, flushing
//! after every group so progress is on disk while the run continues.

use super::classify::{classify, PageContent};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Buffer size for file sinks
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Writes one top-level JSON array incrementally
pub struct JsonArrayWriter<W: Write> {
    inner: W,
    /// Whether any group has been emitted yet
    has_content: bool,
    groups_written: usize,
    bytes_written: u64,
}

impl JsonArrayWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and open the array
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::output(format!("Failed to create {}: {e}", path.display())))?;
        Self::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
    }
}

impl<W: Write> JsonArrayWriter<W> {
    /// Wrap a sink and write the opening bracket
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = Self {
            inner,
            has_content: false,
            groups_written: 0,
            bytes_written: 0,
        };
        writer.write_raw("[")?;
        Ok(writer)
    }

    /// Classify a page body and write whatever it contributes
    ///
    /// Empty arrays write nothing, not even a separator.
    pub fn write_page<'a>(&mut self, body: &'a str) -> Result<PageContent<'a>> {
        let content = classify(body);
        if let Some(group) = content.group() {
            self.write_group(group)?;
        }
        Ok(content)
    }

    /// Write one element group, preceded by a comma unless it is the first
    pub fn write_group(&mut self, group: &str) -> Result<()> {
        if self.has_content {
            self.write_raw(",")?;
        }
        self.write_raw(group)?;
        self.has_content = true;
        self.groups_written += 1;
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| Error::output(format!("Failed to flush output: {e}")))
    }

    /// Number of element groups written
    pub fn groups_written(&self) -> usize {
        self.groups_written
    }

    /// Bytes written so far, including brackets and separators
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Write the closing bracket, flush, and return the sink with the
    /// total number of bytes written
    pub fn finish(mut self) -> Result<(W, u64)> {
        self.write_raw("]")?;
        self.flush()?;
        Ok((self.inner, self.bytes_written))
    }

    fn write_raw(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_all(text.as_bytes())
            .map_err(|e| Error::output(format!("Failed to write output: {e}")))?;
        self.bytes_written += text.len() as u64;
        Ok(())
    }
}

impl<W: Write> std::fmt::Debug for JsonArrayWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonArrayWriter")
            .field("groups_written", &self.groups_written)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}
