//! Gzip-backed implementation of the [`Reader`] contract.

use crate::handle::{GzHandle, STREAM_SOURCE_NAME};
use crate::header::GzipHeader;
use byteme_core::error::Result;
use byteme_core::options::ReaderOptions;
use byteme_core::reader::{Reader, StreamState};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads decoded bytes from a gzip stream, one buffer-full at a time.
///
/// The buffer is allocated once at construction and reused by every
/// [`load`](Reader::load). Concatenated gzip members are decoded as a single
/// logical stream; bytes after the last member that do not start another
/// member are ignored.
///
/// ```rust,no_run
/// use byteme_core::Reader;
/// use byteme_gzip::GzipFileReader;
///
/// let mut reader = GzipFileReader::open("data.txt.gz")?;
/// let mut total = 0;
/// while reader.load()? {
///     total += reader.available();
/// }
/// println!("{total} bytes");
/// # Ok::<(), byteme_core::ByteStreamError>(())
/// ```
#[derive(Debug)]
pub struct GzipReader<R: BufRead> {
    handle: GzHandle<R>,
    buffer: Box<[u8]>,
    available: usize,
    state: StreamState,
}

/// Gzip reader over a file on disk.
pub type GzipFileReader = GzipReader<BufReader<File>>;

impl GzipReader<BufReader<File>> {
    /// Open a gzip file with the default 64 KiB buffer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    /// Open a gzip file with a buffer of `buffer_size` bytes.
    pub fn with_buffer_size(path: impl AsRef<Path>, buffer_size: usize) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::new().with_buffer_size(buffer_size))
    }

    /// Open a gzip file with explicit options.
    pub fn open_with_options(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        options.validate()?;
        let handle = GzHandle::acquire(path.as_ref())?;
        Ok(Self::with_handle(handle, options))
    }
}

impl<R: BufRead> GzipReader<R> {
    /// Decode gzip data from an arbitrary buffered source.
    pub fn from_reader(source: R, options: ReaderOptions) -> Result<Self> {
        Self::from_named_reader(source, STREAM_SOURCE_NAME, options)
    }

    /// Like [`from_reader`](Self::from_reader), labelling errors with `source_name`.
    pub fn from_named_reader(
        source: R,
        source_name: impl Into<String>,
        options: ReaderOptions,
    ) -> Result<Self> {
        options.validate()?;
        let handle = GzHandle::from_reader(source, source_name)?;
        Ok(Self::with_handle(handle, options))
    }

    fn with_handle(handle: GzHandle<R>, options: ReaderOptions) -> Self {
        Self {
            handle,
            buffer: vec![0u8; options.buffer_size].into_boxed_slice(),
            available: 0,
            state: StreamState::Streaming,
        }
    }

    /// Header of the first gzip member.
    pub fn header(&self) -> &GzipHeader {
        self.handle.header()
    }

    /// Path or label of the source.
    pub fn source_name(&self) -> &str {
        self.handle.source_name()
    }

    /// Total decoded bytes delivered so far.
    pub fn bytes_decoded(&self) -> u64 {
        self.handle.bytes_decoded()
    }

    /// Whether the stream ended cleanly.
    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Whether a decode fault was reported. Every later `load()` repeats it.
    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    /// Buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl<R: BufRead> Reader for GzipReader<R> {
    fn load(&mut self) -> Result<bool> {
        if let Some(outcome) = self.state.settled() {
            return outcome;
        }

        let n = match self.handle.decode(&mut self.buffer) {
            Ok(n) => n,
            Err(e) => {
                self.available = 0;
                tracing::debug!(source = %self.handle.source_name(), error = %e, "gzip decode failed");
                return Err(self.state.fail(e.to_string()));
            }
        };

        self.available = n;
        if n > 0 {
            return Ok(true);
        }

        // `decode` only returns 0 unfinished for an empty buffer, which
        // option validation rules out.
        if !self.handle.is_finished() {
            return Err(self
                .state
                .fail("gzip decoder produced no output before the end of the stream"));
        }

        self.state = StreamState::Exhausted;
        tracing::trace!(
            source = %self.handle.source_name(),
            bytes_decoded = self.handle.bytes_decoded(),
            "gzip stream exhausted"
        );
        Ok(false)
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn available(&self) -> usize {
        self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteme_core::ByteStreamError;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::{Cursor, Write};

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn memory_reader(data: &[u8], buffer_size: usize) -> GzipReader<Cursor<Vec<u8>>> {
        let options = ReaderOptions::new().with_buffer_size(buffer_size);
        GzipReader::from_reader(Cursor::new(gzip(data)), options).unwrap()
    }

    #[test]
    fn test_no_implicit_first_read() {
        let reader = memory_reader(b"0123456789", 4);
        assert_eq!(reader.available(), 0);
        assert_eq!(reader.bytes_decoded(), 0);
        assert_eq!(reader.capacity(), 4);
        assert!(!reader.is_exhausted());
    }

    #[test]
    fn test_ten_bytes_buffer_four() {
        let mut reader = memory_reader(b"0123456789", 4);
        let mut trace = Vec::new();
        while reader.load().unwrap() {
            trace.push(reader.chunk().to_vec());
        }
        assert_eq!(trace, vec![b"0123".to_vec(), b"4567".to_vec(), b"89".to_vec()]);
        assert_eq!(reader.bytes_decoded(), 10);
        assert!(reader.is_exhausted());
        assert!(!reader.load().unwrap());
    }

    #[test]
    fn test_empty_member() {
        let mut reader = memory_reader(b"", 16);
        assert!(!reader.load().unwrap());
        assert_eq!(reader.available(), 0);
    }

    #[test]
    fn test_concatenated_members() {
        let mut data = gzip(b"first,");
        data.extend_from_slice(&gzip(b"second"));
        let reader = GzipReader::from_reader(Cursor::new(data), ReaderOptions::default()).unwrap();
        assert_eq!(byteme_core::read_to_vec(reader).unwrap(), b"first,second");
    }

    #[test]
    fn test_truncated_is_decode_error() {
        let mut data = gzip(&[42u8; 4096]);
        data.truncate(data.len() - 4);
        let mut reader =
            GzipReader::from_reader(Cursor::new(data), ReaderOptions::default()).unwrap();
        let err = loop {
            match reader.load() {
                Ok(true) => continue,
                Ok(false) => panic!("truncated stream reported as exhausted"),
                Err(e) => break e,
            }
        };
        assert!(err.is_decode());
        assert!(!reader.is_exhausted());
        assert!(reader.is_failed());
    }

    #[test]
    fn test_fault_repeats_on_every_load() {
        let mut data = gzip(b"checksummed");
        let len = data.len();
        data[len - 8] ^= 0x01; // CRC-32 in the trailer
        let mut reader =
            GzipReader::from_reader(Cursor::new(data), ReaderOptions::default()).unwrap();

        assert!(reader.load().unwrap());
        assert_eq!(reader.chunk(), b"checksummed");
        let first = reader.load().unwrap_err();
        let second = reader.load().unwrap_err();
        assert!(first.is_decode() && second.is_decode());
        assert_eq!(first.message(), second.message());
        assert_eq!(reader.available(), 0);
        assert!(reader.is_failed());
        assert!(!reader.is_exhausted());
    }

    #[test]
    fn test_trailing_zero_padding_is_ignored() {
        let mut data = gzip(b"hello");
        data.extend_from_slice(&[0u8; 512]);
        let mut reader =
            GzipReader::from_reader(Cursor::new(data), ReaderOptions::default()).unwrap();
        assert!(reader.load().unwrap());
        assert_eq!(reader.chunk(), b"hello");
        assert!(!reader.load().unwrap());
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let err = GzipReader::from_reader(Cursor::new(gzip(b"x")), ReaderOptions::from(0))
            .unwrap_err();
        assert!(matches!(err, ByteStreamError::InvalidBufferSize { size: 0 }));
    }

    #[test]
    fn test_named_reader_labels_errors() {
        let err = GzipReader::from_named_reader(
            Cursor::new(b"nope".to_vec()),
            "inline.gz",
            ReaderOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("inline.gz"));
    }
}
