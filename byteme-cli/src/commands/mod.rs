//! Command implementations for the byteme CLI.

pub mod cat;
pub mod check;
pub mod count;
pub mod info;

pub use cat::cmd_cat;
pub use check::cmd_check;
pub use count::cmd_count;
pub use info::cmd_info;

use byteme_core::{ByteStreamError, Reader};
use indicatif::ProgressBar;
use thiserror::Error;

/// Totals gathered while draining a reader.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub chunks: u64,
    pub bytes: u64,
    pub largest_chunk: usize,
}

/// Why a drain stopped early.
#[derive(Debug, Error)]
pub enum DrainError {
    /// The reader reported a fault.
    #[error("{0}")]
    Source(#[from] ByteStreamError),
    /// The sink refused the bytes.
    #[error("write failed: {0}")]
    Sink(std::io::Error),
}

/// Pull every chunk out of `reader`, handing each to `sink` before the next `load()`.
pub fn drain<R, F>(
    mut reader: R,
    progress: &ProgressBar,
    mut sink: F,
) -> Result<StreamStats, DrainError>
where
    R: Reader,
    F: FnMut(&[u8]) -> std::io::Result<()>,
{
    let mut stats = StreamStats::default();
    while reader.load()? {
        let chunk = reader.chunk();
        sink(chunk).map_err(DrainError::Sink)?;

        stats.chunks += 1;
        stats.bytes += chunk.len() as u64;
        stats.largest_chunk = stats.largest_chunk.max(chunk.len());
        progress.inc(chunk.len() as u64);
    }
    Ok(stats)
}
