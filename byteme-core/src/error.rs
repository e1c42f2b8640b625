//! Error types for byteme readers.
//!
//! Two failure classes exist, and they never overlap:
//!
//! - [`ByteStreamError::Open`] is raised by constructors only. A reader that
//!   failed to open never exists, so there is nothing to clean up.
//! - [`ByteStreamError::Decode`] is raised by [`Reader::load`](crate::Reader::load)
//!   when the source reports a fault. Ordinary end of stream is *not* an
//!   error; it is `load()` returning `Ok(false)`.

use std::io;
use std::path::Path;
use thiserror::Error;

/// The main error type for byteme operations.
#[derive(Debug, Error)]
pub enum ByteStreamError {
    /// The source could not be opened, or it does not start with a valid header.
    #[error("cannot open {source_name}: {message}")]
    Open {
        /// Display name of the source (a path, or `<memory>`).
        source_name: String,
        /// Description of the failure.
        message: String,
    },

    /// The source signalled corruption or a read fault that is not end of stream.
    #[error("decode error: {message}")]
    Decode {
        /// Diagnostic message from the decoding engine, kept verbatim.
        message: String,
    },

    /// A reader was configured with an unusable buffer capacity.
    #[error("invalid buffer size {size}: must be at least 1 byte")]
    InvalidBufferSize {
        /// The rejected capacity.
        size: usize,
    },
}

/// Result type alias for byteme operations.
pub type Result<T> = std::result::Result<T, ByteStreamError>;

impl ByteStreamError {
    /// Create an open error.
    pub fn open(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Open {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an open error for a filesystem path from an I/O failure.
    pub fn open_path(path: &Path, err: &io::Error) -> Self {
        Self::open(path.display().to_string(), err.to_string())
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid buffer size error.
    pub fn invalid_buffer_size(size: usize) -> Self {
        Self::InvalidBufferSize { size }
    }

    /// Whether this error was raised while opening a source.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Whether this error was raised while decoding.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// The bare diagnostic message, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Open { message, .. } | Self::Decode { message } => message.clone(),
            Self::InvalidBufferSize { .. } => self.to_string(),
        }
    }
}

impl From<io::Error> for ByteStreamError {
    /// I/O failures reaching a reader after construction are read faults.
    fn from(err: io::Error) -> Self {
        Self::decode(err.to_string())
    }
}
