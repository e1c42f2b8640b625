//! Count command implementation.

use super::drain;
use crate::utils::{SourceMode, create_progress_bar, human_bytes, open_source};
use byteme_core::ReaderOptions;
use serde::Serialize;
use std::path::Path;

/// JSON output for the count command.
#[derive(Debug, Serialize)]
struct CountJson {
    file: String,
    buffer_size: usize,
    chunks: u64,
    bytes: u64,
    largest_chunk: usize,
    crc32: String,
}

pub fn cmd_count(
    file: &Path,
    options: ReaderOptions,
    mode: SourceMode,
    json: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = open_source(file, options, mode)?;

    let mut hasher = crc32fast::Hasher::new();
    let pb = create_progress_bar(progress && !json);
    let result = drain(reader, &pb, |chunk| {
        hasher.update(chunk);
        Ok(())
    });
    pb.finish_and_clear();
    let stats = result?;
    let crc = hasher.finalize();

    if json {
        let output = CountJson {
            file: file.display().to_string(),
            buffer_size: options.buffer_size,
            chunks: stats.chunks,
            bytes: stats.bytes,
            largest_chunk: stats.largest_chunk,
            crc32: format!("{:08x}", crc),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("Buffer size: {} bytes", options.buffer_size);
    println!("Chunks: {}", stats.chunks);
    println!("Bytes: {} ({})", stats.bytes, human_bytes(stats.bytes));
    println!("Largest chunk: {} bytes", stats.largest_chunk);
    println!("CRC-32: {:08x}", crc);

    Ok(())
}
