//! Consumer-side helpers built purely on the [`Reader`] contract.

use crate::error::{ByteStreamError, Result};
use crate::reader::Reader;
use std::io::{self, Read};

/// Drain a reader into an owned vector.
pub fn read_to_vec<R: Reader>(mut reader: R) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    while reader.load()? {
        out.extend_from_slice(reader.chunk());
    }
    Ok(out)
}

/// Walk a reader one byte at a time, loading chunks on demand.
///
/// ```rust
/// use byteme_core::{ByteCursor, RawBufferReader};
///
/// let mut cursor = ByteCursor::new(RawBufferReader::new(b"hi")).unwrap();
/// assert_eq!(cursor.get(), Some(b'h'));
/// assert!(cursor.advance().unwrap());
/// assert_eq!(cursor.get(), Some(b'i'));
/// assert!(!cursor.advance().unwrap());
/// assert_eq!(cursor.position(), 2);
/// ```
#[derive(Debug)]
pub struct ByteCursor<R: Reader> {
    reader: R,
    offset: usize,
    position: u64,
    valid: bool,
}

impl<R: Reader> ByteCursor<R> {
    /// Wrap `reader` and load its first chunk.
    pub fn new(reader: R) -> Result<Self> {
        let mut cursor = Self {
            reader,
            offset: 0,
            position: 0,
            valid: true,
        };
        cursor.valid = cursor.refill()?;
        Ok(cursor)
    }

    /// Whether the cursor points at a byte.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// The current byte, or `None` once the reader is exhausted.
    pub fn get(&self) -> Option<u8> {
        if self.valid {
            Some(self.reader.chunk()[self.offset])
        } else {
            None
        }
    }

    /// Number of bytes stepped over so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Step to the next byte. Returns `false` when the reader is exhausted.
    pub fn advance(&mut self) -> Result<bool> {
        if !self.valid {
            return Ok(false);
        }

        self.offset += 1;
        self.position += 1;
        if self.offset < self.reader.available() {
            return Ok(true);
        }

        self.valid = self.refill()?;
        Ok(self.valid)
    }

    /// Give back the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn refill(&mut self) -> Result<bool> {
        self.offset = 0;
        while self.reader.load()? {
            if self.reader.available() > 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Adapt a [`Reader`] to [`std::io::Read`].
///
/// Decode faults surface as [`io::ErrorKind::InvalidData`].
#[derive(Debug)]
pub struct ChunkRead<R: Reader> {
    reader: R,
    offset: usize,
    done: bool,
}

impl<R: Reader> ChunkRead<R> {
    /// Wrap `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            done: false,
        }
    }

    /// Give back the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Reader> Read for ChunkRead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while !self.done && self.offset >= self.reader.available() {
            self.offset = 0;
            self.done = !self.reader.load().map_err(into_io)?;
        }
        if self.done {
            return Ok(0);
        }

        let pending = &self.reader.chunk()[self.offset..];
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        self.offset += n;
        Ok(n)
    }
}

fn into_io(err: ByteStreamError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ReaderOptions;
    use crate::raw_buffer::RawBufferReader;

    #[derive(Debug)]
    struct Broken;

    impl Reader for Broken {
        fn load(&mut self) -> Result<bool> {
            Err(ByteStreamError::decode("broken source"))
        }

        fn buffer(&self) -> &[u8] {
            &[]
        }

        fn available(&self) -> usize {
            0
        }
    }

    fn chunked(data: &[u8], size: usize) -> RawBufferReader<'_> {
        RawBufferReader::with_options(data, ReaderOptions::new().with_buffer_size(size)).unwrap()
    }

    #[test]
    fn test_read_to_vec() {
        assert_eq!(read_to_vec(chunked(b"hello world", 3)).unwrap(), b"hello world");
        assert!(read_to_vec(chunked(b"", 3)).unwrap().is_empty());
    }

    #[test]
    fn test_cursor_crosses_chunks() {
        let mut cursor = ByteCursor::new(chunked(b"abcde", 2)).unwrap();
        let mut seen = Vec::new();
        while let Some(byte) = cursor.get() {
            seen.push(byte);
            cursor.advance().unwrap();
        }
        assert_eq!(seen, b"abcde");
        assert_eq!(cursor.position(), 5);
        assert!(!cursor.valid());
        assert!(!cursor.advance().unwrap());
    }

    #[test]
    fn test_cursor_on_empty() {
        let cursor = ByteCursor::new(chunked(b"", 2)).unwrap();
        assert!(!cursor.valid());
        assert_eq!(cursor.get(), None);
    }

    #[test]
    fn test_cursor_propagates_error() {
        assert!(ByteCursor::new(Broken).unwrap_err().is_decode());
    }

    #[test]
    fn test_chunk_read_small_buffer() {
        let mut adapter = ChunkRead::new(chunked(b"0123456789", 4));
        let mut out = Vec::new();
        let mut buf = [0u8; 3];
        loop {
            let n = adapter.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, b"0123456789");
    }

    #[test]
    fn test_chunk_read_error_kind() {
        let mut adapter = ChunkRead::new(Broken);
        let err = adapter.read_to_end(&mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("broken source"));
    }
}
