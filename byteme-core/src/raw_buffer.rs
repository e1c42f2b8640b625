//! Serve an in-memory byte slice through the [`Reader`] contract.

use crate::error::Result;
use crate::options::ReaderOptions;
use crate::reader::{Reader, StreamState};

/// Reader over bytes that are already in memory.
///
/// Chunks are borrowed views into the source slice, so nothing is copied.
/// Each chunk holds at most `buffer_size` bytes.
#[derive(Debug, Clone)]
pub struct RawBufferReader<'a> {
    data: &'a [u8],
    chunk_size: usize,
    start: usize,
    available: usize,
    state: StreamState,
}

impl<'a> RawBufferReader<'a> {
    /// Deliver `data` in chunks of the default buffer size.
    pub fn new(data: &'a [u8]) -> Self {
        Self::build(data, ReaderOptions::default().buffer_size)
    }

    /// Deliver `data` in chunks of at most `options.buffer_size` bytes.
    pub fn with_options(data: &'a [u8], options: ReaderOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(data, options.buffer_size))
    }

    fn build(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            chunk_size,
            start: 0,
            available: 0,
            state: StreamState::Streaming,
        }
    }

    /// Whether the end of the slice was reached.
    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }
}

impl Reader for RawBufferReader<'_> {
    fn load(&mut self) -> Result<bool> {
        if self.state.is_exhausted() {
            return Ok(false);
        }

        self.start += self.available;
        let remaining = self.data.len() - self.start;
        if remaining == 0 {
            self.available = 0;
            self.state = StreamState::Exhausted;
            return Ok(false);
        }

        self.available = remaining.min(self.chunk_size);
        Ok(true)
    }

    fn buffer(&self) -> &[u8] {
        &self.data[self.start..self.start + self.available]
    }

    fn available(&self) -> usize {
        self.available
    }
}
