//! The pull-based reader contract.
//!
//! A consumer drives any byte source through three operations:
//!
//! ```text
//! while reader.load()? {
//!     consume(&reader.buffer()[..reader.available()]);
//! }
//! ```
//!
//! Each successful `load()` refills the *same* buffer. The borrow checker
//! enforces that a view obtained from [`Reader::buffer`] cannot outlive the
//! next `load()`; callers that need bytes across calls must copy them out.

use crate::error::{ByteStreamError, Result};

/// A source of bytes delivered in successive chunks.
///
/// Implementations must uphold:
///
/// - `load()` returns `Ok(true)` only when at least one byte was placed in the
///   buffer, so `available() > 0` after every `true`.
/// - `load()` returns `Ok(false)` when the source is permanently exhausted.
///   Further calls keep returning `Ok(false)`.
/// - Faults are returned as [`ByteStreamError::Decode`](crate::ByteStreamError::Decode)
///   and are never reported as exhaustion.
/// - `available() <= buffer().len()` at all times, and `available()` is 0
///   before the first `load()`.
pub trait Reader {
    /// Refill the buffer with the next chunk of bytes.
    fn load(&mut self) -> Result<bool>;

    /// The buffer storage. Only the first [`available`](Reader::available) bytes are meaningful.
    fn buffer(&self) -> &[u8];

    /// Number of valid bytes in the buffer after the most recent `load()`.
    fn available(&self) -> usize;

    /// The valid portion of the buffer.
    fn chunk(&self) -> &[u8] {
        &self.buffer()[..self.available()]
    }
}

impl<R: Reader + ?Sized> Reader for &mut R {
    fn load(&mut self) -> Result<bool> {
        (**self).load()
    }

    fn buffer(&self) -> &[u8] {
        (**self).buffer()
    }

    fn available(&self) -> usize {
        (**self).available()
    }
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    fn load(&mut self) -> Result<bool> {
        (**self).load()
    }

    fn buffer(&self) -> &[u8] {
        (**self).buffer()
    }

    fn available(&self) -> usize {
        (**self).available()
    }
}

/// State machine shared by the buffered readers.
///
/// Both `Exhausted` and `Failed` are terminal: once reached, every further
/// `load()` repeats the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamState {
    /// More data may follow.
    #[default]
    Streaming,
    /// The source reported a clean end of stream.
    Exhausted,
    /// The source reported a fault, kept with its diagnostic.
    Failed(String),
}

impl StreamState {
    /// Whether the stream ended cleanly.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Whether a fault was reported.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Outcome a terminal state forces on `load()`, or `None` while streaming.
    pub fn settled(&self) -> Option<Result<bool>> {
        match self {
            Self::Streaming => None,
            Self::Exhausted => Some(Ok(false)),
            Self::Failed(message) => Some(Err(ByteStreamError::decode(message.clone()))),
        }
    }

    /// Enter the failed state and return the error to report.
    pub fn fail(&mut self, message: impl Into<String>) -> ByteStreamError {
        let message = message.into();
        *self = Self::Failed(message.clone());
        ByteStreamError::decode(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        left: u8,
        buf: [u8; 1],
        available: usize,
    }

    impl Reader for Countdown {
        fn load(&mut self) -> Result<bool> {
            if self.left == 0 {
                self.available = 0;
                return Ok(false);
            }
            self.buf[0] = self.left;
            self.left -= 1;
            self.available = 1;
            Ok(true)
        }

        fn buffer(&self) -> &[u8] {
            &self.buf
        }

        fn available(&self) -> usize {
            self.available
        }
    }

    fn drain<R: Reader>(mut reader: R) -> Vec<u8> {
        let mut out = Vec::new();
        while reader.load().unwrap() {
            out.extend_from_slice(reader.chunk());
        }
        out
    }

    #[test]
    fn test_chunk_respects_available() {
        let mut reader = Countdown {
            left: 1,
            buf: [0],
            available: 0,
        };
        assert!(reader.chunk().is_empty());
        assert!(reader.load().unwrap());
        assert_eq!(reader.chunk(), &[1u8]);
    }

    #[test]
    fn test_mut_ref_and_box_forward() {
        let mut reader = Countdown {
            left: 3,
            buf: [0],
            available: 0,
        };
        assert_eq!(drain(&mut reader), vec![3, 2, 1]);

        let boxed: Box<dyn Reader> = Box::new(Countdown {
            left: 2,
            buf: [0],
            available: 0,
        });
        assert_eq!(drain(boxed), vec![2, 1]);
    }

    #[test]
    fn test_stream_state_default() {
        assert_eq!(StreamState::default(), StreamState::Streaming);
        assert!(StreamState::Exhausted.is_exhausted());
        assert!(StreamState::Streaming.settled().is_none());
    }

    #[test]
    fn test_failed_state_repeats_fault() {
        let mut state = StreamState::Streaming;
        let err = state.fail("invalid block type");
        assert!(err.is_decode());
        assert!(state.is_failed());
        assert!(!state.is_exhausted());

        for _ in 0..2 {
            let again = state.settled().unwrap().unwrap_err();
            assert_eq!(again.message(), "invalid block type");
        }
        assert!(!StreamState::Exhausted.settled().unwrap().unwrap());
    }
}
