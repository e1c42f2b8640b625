//! Reader configuration.

use crate::error::{ByteStreamError, Result};

/// Default capacity of a reader's buffer, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 65536;

/// Construction parameters shared by all buffered readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Capacity of the read buffer. Allocated once, reused by every `load()`.
    pub buffer_size: usize,
}

impl ReaderOptions {
    /// Options with the default buffer size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the buffer capacity.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Reject capacities that could never hold a byte.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(ByteStreamError::invalid_buffer_size(self.buffer_size));
        }
        Ok(())
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl From<usize> for ReaderOptions {
    fn from(buffer_size: usize) -> Self {
        Self { buffer_size }
    }
}
