//! Scoped ownership of an open gzip decode session.
//!
//! A [`GzHandle`] is acquired once, owned by exactly one reader, and released
//! when that reader is dropped. It is neither `Clone` nor `Copy`, so the
//! underlying file descriptor and inflate state can only be closed once,
//! whatever path the owning scope exits through.

use crate::header::{GZIP_MAGIC, GzipHeader};
use byteme_core::error::{ByteStreamError, Result};
use flate2::bufread::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Chain, Cursor, ErrorKind, Read};
use std::path::Path;

/// Source name used for streams that have no path.
pub const STREAM_SOURCE_NAME: &str = "<stream>";

type Source<R> = Chain<Cursor<Vec<u8>>, R>;

/// Inflate state: inside a member, or past the last one.
enum Engine<R: BufRead> {
    Member(GzDecoder<Source<R>>),
    Done(Source<R>),
}

/// An open, positioned, decompressing gzip stream.
pub struct GzHandle<R: BufRead> {
    engine: Option<Engine<R>>,
    header: GzipHeader,
    source_name: String,
    finished: bool,
    pending_error: Option<io::Error>,
    bytes_decoded: u64,
}

impl GzHandle<BufReader<File>> {
    /// Open `path` for binary reading and validate its gzip header.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ByteStreamError::open_path(path, &e))?;
        Self::from_reader(BufReader::new(file), path.display().to_string())
    }
}

impl<R: BufRead> GzHandle<R> {
    /// Take ownership of an already opened source and validate its gzip header.
    ///
    /// On failure the source is dropped before returning, so nothing stays open.
    pub fn from_reader(mut source: R, source_name: impl Into<String>) -> Result<Self> {
        let source_name = source_name.into();
        let (header, consumed) = GzipHeader::read(&mut source)
            .map_err(|e| ByteStreamError::open(source_name.as_str(), e.to_string()))?;

        tracing::debug!(
            source = %source_name,
            filename = ?header.filename,
            mtime = header.mtime,
            os = header.os_name(),
            "acquired gzip handle"
        );

        // The engine parses the header again; it must see the stream from byte 0.
        let engine = GzDecoder::new(Cursor::new(consumed).chain(source));
        Ok(Self {
            engine: Some(Engine::Member(engine)),
            header,
            source_name,
            finished: false,
            pending_error: None,
            bytes_decoded: 0,
        })
    }

    /// Decode into `out` until it is full or the stream ends, and return how
    /// many bytes were produced.
    ///
    /// A return of `Ok(0)` for a non-empty `out` means a clean end of stream,
    /// observable afterwards through [`is_finished`](Self::is_finished).
    /// A fault hit after some bytes were produced is held back and returned
    /// by the next call, so those bytes are not lost.
    pub fn decode(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = self.pending_error.take() {
            return Err(err);
        }
        if self.finished || out.is_empty() {
            return Ok(0);
        }

        let mut filled = 0;
        while filled < out.len() {
            match self.read_engine(&mut out[filled..]) {
                Ok(0) => {
                    self.finished = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if filled == 0 => return Err(e),
                Err(e) => {
                    self.pending_error = Some(e);
                    break;
                }
            }
        }

        self.bytes_decoded += filled as u64;
        Ok(filled)
    }

    /// Read from the current member, moving on to the next one when it ends.
    /// `Ok(0)` means the last member ended cleanly.
    fn read_engine(&mut self, out: &mut [u8]) -> io::Result<usize> {
        loop {
            let Some(Engine::Member(decoder)) = self.engine.as_mut() else {
                return Ok(0);
            };
            let n = decoder.read(out)?;
            if n > 0 || !self.next_member()? {
                return Ok(n);
            }
        }
    }

    /// Called when a member ended cleanly. Starts another member if the
    /// remaining input begins with the gzip magic; anything else is trailing
    /// data and ends the stream, as `gzread` does.
    fn next_member(&mut self) -> io::Result<bool> {
        let mut source = match self.engine.take() {
            Some(Engine::Member(decoder)) => decoder.into_inner(),
            other => {
                self.engine = other;
                return Ok(false);
            }
        };

        let peeked = loop {
            match source.fill_buf() {
                Ok(next) => break Ok(is_member_start(next)),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => break Err(e),
            }
        };
        let more = match peeked {
            Ok(more) => more,
            Err(e) => {
                self.engine = Some(Engine::Done(source));
                return Err(e);
            }
        };

        if more {
            self.engine = Some(Engine::Member(GzDecoder::new(source)));
        } else {
            tracing::trace!(source = %self.source_name, "no further gzip member");
            self.engine = Some(Engine::Done(source));
        }
        Ok(more)
    }

    /// Whether the engine reported a clean end of stream.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Header of the first gzip member.
    pub fn header(&self) -> &GzipHeader {
        &self.header
    }

    /// Path or label the handle was opened from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Total decoded bytes produced so far.
    pub fn bytes_decoded(&self) -> u64 {
        self.bytes_decoded
    }
}

/// A lone `1f` at the end of the buffered window is taken as a member start;
/// the decoder then rejects it if the second magic byte does not follow.
fn is_member_start(next: &[u8]) -> bool {
    match next {
        [first, second, ..] => [*first, *second] == GZIP_MAGIC,
        [first] => *first == GZIP_MAGIC[0],
        [] => false,
    }
}

impl<R: BufRead> Drop for GzHandle<R> {
    fn drop(&mut self) {
        tracing::debug!(
            source = %self.source_name,
            bytes_decoded = self.bytes_decoded,
            finished = self.finished,
            "released gzip handle"
        );
    }
}

impl<R: BufRead> std::fmt::Debug for GzHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GzHandle")
            .field("source_name", &self.source_name)
            .field("header", &self.header)
            .field("finished", &self.finished)
            .field("pending_error", &self.pending_error)
            .field("bytes_decoded", &self.bytes_decoded)
            .finish_non_exhaustive()
    }
}
