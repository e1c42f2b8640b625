//! Check command implementation.

use super::drain;
use crate::utils::{SourceMode, open_source};
use byteme_core::ReaderOptions;
use indicatif::ProgressBar;
use std::path::PathBuf;

pub fn cmd_check(
    files: &[PathBuf],
    options: ReaderOptions,
    mode: SourceMode,
    sizes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut failed = 0usize;

    for file in files {
        let name = file.display().to_string();
        let outcome = open_source(file, options, mode)
            .map_err(|e| e.to_string())
            .and_then(|reader| {
                drain(reader, &ProgressBar::hidden(), |_| Ok(())).map_err(|e| e.to_string())
            });

        match outcome {
            Ok(stats) => {
                if sizes {
                    println!("  OK: {} ({} bytes)", name, stats.bytes);
                } else {
                    println!("  OK: {}", name);
                }
            }
            Err(message) => {
                println!("  FAILED: {} - {}", name, message);
                failed += 1;
            }
        }
    }

    println!();
    println!(
        "Checked {} file(s): {} OK, {} failed",
        files.len(),
        files.len() - failed,
        failed
    );

    if failed == 0 {
        Ok(())
    } else {
        Err(format!("{} file(s) failed the check", failed).into())
    }
}
