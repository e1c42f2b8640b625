//! byteme CLI
//!
//! Streams gzip (and optionally plain) files through the chunked `Reader`
//! contract and reports what came out.

mod commands;
mod utils;

use byteme_core::{DEFAULT_BUFFER_SIZE, ReaderOptions};
use clap::{ArgAction, Parser, Subcommand};
use commands::{cmd_cat, cmd_check, cmd_count, cmd_info};
use std::path::PathBuf;
use utils::{SourceMode, init_tracing};

#[derive(Parser)]
#[command(name = "byteme")]
#[command(author, version, about = "Chunked reader for gzip-compressed files")]
#[command(long_about = "
byteme decodes gzip files one buffer at a time and hands every chunk to a
consumer before reading the next. Decode faults are reported verbatim and are
never mistaken for a clean end of stream.

Examples:
  byteme cat data.txt.gz
  byteme cat --auto maybe-compressed.log
  byteme count -b 4096 data.bin.gz
  byteme count --json data.bin.gz
  byteme info archive.gz
  byteme check *.gz
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read buffer size in bytes
    #[arg(
        short = 'b',
        long,
        global = true,
        env = "BYTEME_BUFFER_SIZE",
        default_value_t = DEFAULT_BUFFER_SIZE
    )]
    buffer_size: usize,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbosity: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the decoded contents of a file to stdout
    Cat {
        /// Gzip file to decode
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pass non-gzip files through unchanged
        #[arg(short, long)]
        auto: bool,

        /// Never decode; copy the file as-is
        #[arg(long)]
        plain: bool,

        /// Show a progress spinner on stderr
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Count chunks and decoded bytes, and checksum the output
    Count {
        /// File to read
        file: PathBuf,

        /// Pass non-gzip files through unchanged
        #[arg(short, long)]
        auto: bool,

        /// Never decode; count the raw file
        #[arg(long)]
        plain: bool,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Show a progress spinner on stderr
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Show format and gzip header information
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Decode files to the end and report faults
    #[command(alias = "t")]
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Accept non-gzip files as plain data
        #[arg(short, long)]
        auto: bool,

        /// Show decoded sizes
        #[arg(long)]
        sizes: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let options = ReaderOptions::new().with_buffer_size(cli.buffer_size);

    let result = match cli.command {
        Commands::Cat {
            file,
            output,
            auto,
            plain,
            progress,
        } => cmd_cat(
            &file,
            output.as_ref(),
            options,
            SourceMode::from_flags(auto, plain),
            progress,
        ),
        Commands::Count {
            file,
            auto,
            plain,
            json,
            progress,
        } => cmd_count(
            &file,
            options,
            SourceMode::from_flags(auto, plain),
            json,
            progress,
        ),
        Commands::Info { file, json } => cmd_info(&file, json),
        Commands::Check { files, auto, sizes } => cmd_check(
            &files,
            options,
            SourceMode::from_flags(auto, false),
            sizes,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
