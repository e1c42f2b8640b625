//! Uncompressed sources read into a reused buffer.

use crate::error::{ByteStreamError, Result};
use crate::options::ReaderOptions;
use crate::reader::{Reader, StreamState};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Reader over any [`Read`] implementation, without decoding.
#[derive(Debug)]
pub struct RawReader<R: Read> {
    source: R,
    buffer: Box<[u8]>,
    available: usize,
    state: StreamState,
}

/// Reader over an uncompressed file.
pub type RawFileReader = RawReader<File>;

impl RawReader<File> {
    /// Open `path` with the default buffer size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ReaderOptions::default())
    }

    /// Open `path` with explicit options.
    pub fn open_with_options(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        options.validate()?;
        let file = File::open(path).map_err(|e| ByteStreamError::open_path(path, &e))?;
        tracing::debug!(path = %path.display(), "opened plain file");
        Self::from_reader(file, options)
    }
}

impl<R: Read> RawReader<R> {
    /// Wrap an already opened source.
    pub fn from_reader(source: R, options: ReaderOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            source,
            buffer: vec![0u8; options.buffer_size].into_boxed_slice(),
            available: 0,
            state: StreamState::Streaming,
        })
    }

    /// Whether a read fault was reported.
    pub fn is_failed(&self) -> bool {
        self.state.is_failed()
    }

    /// Whether the source reported end of file.
    pub fn is_exhausted(&self) -> bool {
        self.state.is_exhausted()
    }

    /// Buffer capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl<R: Read> Reader for RawReader<R> {
    fn load(&mut self) -> Result<bool> {
        if let Some(outcome) = self.state.settled() {
            return outcome;
        }

        let n = loop {
            match self.source.read(&mut self.buffer) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.available = 0;
                    tracing::debug!(error = %e, "plain read failed");
                    return Err(self.state.fail(e.to_string()));
                }
            }
        };

        self.available = n;
        if n == 0 {
            self.state = StreamState::Exhausted;
            tracing::trace!("plain source exhausted");
            return Ok(false);
        }
        Ok(true)
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn available(&self) -> usize {
        self.available
    }
}
