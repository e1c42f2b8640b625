//! # byteme gzip
//!
//! Gzip-backed readers for the [`byteme_core::Reader`] contract.
//!
//! - [`reader`]: [`GzipReader`] / [`GzipFileReader`], chunked decoding into a reused buffer
//! - [`header`]: RFC 1952 member header parsing and validation
//! - [`detect`]: gzip-or-plain sniffing and [`AnyFileReader`]
//!
//! Decompression itself is delegated to `flate2`; this crate owns the
//! buffering, the end-of-stream versus fault classification, and the
//! lifetime of the underlying file. The decode handle is private to the
//! reader that owns it and is released exactly once, when the reader drops.
//!
//! ## Example
//!
//! ```rust
//! use byteme_core::{Reader, ReaderOptions};
//! use byteme_gzip::GzipReader;
//! use flate2::{Compression, write::GzEncoder};
//! use std::io::{Cursor, Write};
//!
//! let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
//! encoder.write_all(b"0123456789").unwrap();
//! let compressed = encoder.finish().unwrap();
//!
//! let options = ReaderOptions::new().with_buffer_size(4);
//! let mut reader = GzipReader::from_reader(Cursor::new(compressed), options).unwrap();
//!
//! let mut sizes = Vec::new();
//! while reader.load().unwrap() {
//!     sizes.push(reader.available());
//! }
//! assert_eq!(sizes, vec![4, 4, 2]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod detect;
mod handle;
pub mod header;
pub mod reader;

pub use detect::{AnyFileReader, SourceFormat};
pub use handle::STREAM_SOURCE_NAME;
pub use header::{CM_DEFLATE, GZIP_MAGIC, GzipHeader, HeaderError};
pub use reader::{GzipFileReader, GzipReader};
