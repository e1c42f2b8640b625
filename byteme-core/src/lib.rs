//! # byteme core
//!
//! Core components for buffered, chunked reading of byte streams.
//!
//! - [`reader`]: the pull-based [`Reader`] contract (`load`/`buffer`/`available`)
//! - [`error`]: the error taxonomy, separating open failures from decode faults
//! - [`options`]: reader construction parameters
//! - [`raw_buffer`] and [`raw_file`]: readers for uncompressed sources
//! - [`consume`]: helpers that only depend on the contract
//!
//! Compressed sources live in the `byteme-gzip` crate and implement the same trait.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Consumers                                               │
//! │     CLI, validators, ByteCursor, ChunkRead              │
//! ├─────────────────────────────────────────────────────────┤
//! │ Reader contract (this crate)                            │
//! │     load() / buffer() / available()                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Sources                                                 │
//! │     RawBufferReader, RawFileReader, GzipFileReader      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use byteme_core::{RawBufferReader, Reader, ReaderOptions};
//!
//! let options = ReaderOptions::new().with_buffer_size(4);
//! let mut reader = RawBufferReader::with_options(b"0123456789", options).unwrap();
//!
//! let mut chunks = Vec::new();
//! while reader.load().unwrap() {
//!     chunks.push(reader.chunk().to_vec());
//! }
//! assert_eq!(chunks, vec![b"0123".to_vec(), b"4567".to_vec(), b"89".to_vec()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod consume;
pub mod error;
pub mod options;
pub mod raw_buffer;
pub mod raw_file;
pub mod reader;

// Re-exports for convenience
pub use consume::{ByteCursor, ChunkRead, read_to_vec};
pub use error::{ByteStreamError, Result};
pub use options::{DEFAULT_BUFFER_SIZE, ReaderOptions};
pub use raw_buffer::RawBufferReader;
pub use raw_file::{RawFileReader, RawReader};
pub use reader::{Reader, StreamState};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ByteStreamError, Result};
    pub use crate::options::ReaderOptions;
    pub use crate::reader::Reader;
}
