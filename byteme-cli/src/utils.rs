//! Utility functions for the CLI.

use byteme_core::{ByteStreamError, RawFileReader, Reader, ReaderOptions};
use byteme_gzip::{AnyFileReader, GzipFileReader};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// How a file argument should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Require gzip.
    Gzip,
    /// Gzip if the magic matches, plain otherwise.
    Auto,
    /// Never decode.
    Plain,
}

impl SourceMode {
    pub fn from_flags(auto: bool, plain: bool) -> Self {
        if plain {
            Self::Plain
        } else if auto {
            Self::Auto
        } else {
            Self::Gzip
        }
    }
}

/// Open `path` as a reader according to `mode`.
pub fn open_source(
    path: &Path,
    options: ReaderOptions,
    mode: SourceMode,
) -> Result<Box<dyn Reader>, ByteStreamError> {
    let reader: Box<dyn Reader> = match mode {
        SourceMode::Gzip => Box::new(GzipFileReader::open_with_options(path, options)?),
        SourceMode::Auto => Box::new(AnyFileReader::open_with_options(path, options)?),
        SourceMode::Plain => Box::new(RawFileReader::open_with_options(path, options)?),
    };
    Ok(reader)
}

/// Create a spinner that counts decoded bytes.
pub fn create_progress_bar(enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {bytes} decoded ({bytes_per_sec}) {msg}")
            .expect("progress bar template is valid"),
    );
    pb
}

/// Format a byte count with a binary unit.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(1023), "1023 B");
        assert_eq!(human_bytes(1536), "1.5 KiB");
        assert_eq!(human_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_source_mode_from_flags() {
        assert_eq!(SourceMode::from_flags(false, false), SourceMode::Gzip);
        assert_eq!(SourceMode::from_flags(true, false), SourceMode::Auto);
        assert_eq!(SourceMode::from_flags(true, true), SourceMode::Plain);
    }

    #[test]
    fn test_open_source_modes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, b"hello").unwrap();

        let options = ReaderOptions::default();
        let gzip_only = open_source(&path, options, SourceMode::Gzip);
        assert!(matches!(gzip_only, Err(ref e) if e.is_open()));

        let mut reader = open_source(&path, options, SourceMode::Auto).unwrap();
        assert!(reader.load().unwrap());
        assert_eq!(reader.chunk(), b"hello");

        let mut reader = open_source(&path, options, SourceMode::Plain).unwrap();
        assert!(reader.load().unwrap());
    }
}
