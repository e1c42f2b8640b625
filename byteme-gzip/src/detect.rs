//! Source format auto-detection.
//!
//! Chooses between gzip decoding and plain pass-through based on the magic
//! bytes at the start of a file, without opening the file twice.

use crate::header::GZIP_MAGIC;
use crate::reader::GzipReader;
use byteme_core::error::{ByteStreamError, Result};
use byteme_core::options::ReaderOptions;
use byteme_core::raw_file::RawReader;
use byteme_core::reader::Reader;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Formats a file source can be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// GZIP compressed data (.gz).
    Gzip,
    /// Anything else, read as-is.
    Plain,
}

impl SourceFormat {
    /// Detect format from leading bytes.
    pub fn from_magic(magic: &[u8]) -> Self {
        if magic.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else {
            Self::Plain
        }
    }

    /// Detect format from a buffered source without consuming it.
    pub fn sniff<R: BufRead>(reader: &mut R) -> std::io::Result<Self> {
        let peek = reader.fill_buf()?;
        Ok(Self::from_magic(peek))
    }

    /// Get the MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Gzip => "application/gzip",
            Self::Plain => "application/octet-stream",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gzip => write!(f, "GZIP"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// A file reader that decodes gzip files and passes other files through.
#[derive(Debug)]
pub enum AnyFileReader {
    /// The file started with the gzip magic.
    Gzip(GzipReader<BufReader<File>>),
    /// Any other file.
    Plain(RawReader<BufReader<File>>),
}

impl AnyFileReader {
    /// Open `path` with the default buffer size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    /// Open `path`, sniff its format and build the matching reader.
    pub fn open_with_options(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        options.validate()?;

        let file = File::open(path).map_err(|e| ByteStreamError::open_path(path, &e))?;
        let mut source = BufReader::new(file);
        let format =
            SourceFormat::sniff(&mut source).map_err(|e| ByteStreamError::open_path(path, &e))?;
        tracing::debug!(path = %path.display(), %format, "detected source format");

        match format {
            SourceFormat::Gzip => Ok(Self::Gzip(GzipReader::from_named_reader(
                source,
                path.display().to_string(),
                options,
            )?)),
            SourceFormat::Plain => Ok(Self::Plain(RawReader::from_reader(source, options)?)),
        }
    }

    /// The format that was detected.
    pub fn format(&self) -> SourceFormat {
        match self {
            Self::Gzip(_) => SourceFormat::Gzip,
            Self::Plain(_) => SourceFormat::Plain,
        }
    }
}

impl Reader for AnyFileReader {
    fn load(&mut self) -> Result<bool> {
        match self {
            Self::Gzip(reader) => reader.load(),
            Self::Plain(reader) => reader.load(),
        }
    }

    fn buffer(&self) -> &[u8] {
        match self {
            Self::Gzip(reader) => reader.buffer(),
            Self::Plain(reader) => reader.buffer(),
        }
    }

    fn available(&self) -> usize {
        match self {
            Self::Gzip(reader) => reader.available(),
            Self::Plain(reader) => reader.available(),
        }
    }
}
