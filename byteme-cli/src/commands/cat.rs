//! Cat command implementation.

use super::{DrainError, drain};
use crate::utils::{SourceMode, create_progress_bar, open_source};
use byteme_core::ReaderOptions;
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

pub fn cmd_cat(
    file: &Path,
    output: Option<&PathBuf>,
    options: ReaderOptions,
    mode: SourceMode,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = open_source(file, options, mode)?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let pb = create_progress_bar(progress);
    let result = drain(reader, &pb, |chunk| writer.write_all(chunk));
    pb.finish_and_clear();

    match result {
        Ok(stats) => {
            tracing::debug!(chunks = stats.chunks, bytes = stats.bytes, "cat finished");
        }
        // A closed pipe (`byteme cat x.gz | head`) is not a failure.
        Err(DrainError::Sink(e)) if e.kind() == ErrorKind::BrokenPipe => return Ok(()),
        Err(e) => return Err(e.into()),
    }

    match writer.flush() {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}
