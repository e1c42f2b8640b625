//! The underlying source is released exactly once on every exit path.

use byteme_core::{Reader, ReaderOptions};
use byteme_gzip::{GzipFileReader, GzipReader};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{self, BufRead, Cursor, Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory source that counts how many times it is dropped.
#[derive(Debug)]
struct Tracked {
    inner: Cursor<Vec<u8>>,
    drops: Arc<AtomicUsize>,
}

impl Tracked {
    fn new(bytes: Vec<u8>) -> (Self, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        let source = Self {
            inner: Cursor::new(bytes),
            drops: Arc::clone(&drops),
        };
        (source, drops)
    }
}

impl Read for Tracked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for Tracked {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_released_once_after_normal_use() {
    let (source, drops) = Tracked::new(gzip(b"payload"));
    let mut reader = GzipReader::from_reader(source, ReaderOptions::default()).unwrap();
    while reader.load().unwrap() {}
    assert_eq!(drops.load(Ordering::SeqCst), 0);

    drop(reader);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_released_once_after_open_error() {
    let (source, drops) = Tracked::new(b"definitely not gzip".to_vec());
    let result = GzipReader::from_reader(source, ReaderOptions::default());
    assert!(result.unwrap_err().is_open());
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_released_once_after_decode_error() {
    let mut bytes = gzip(&[1u8; 1000]);
    bytes.truncate(bytes.len() / 2);
    let (source, drops) = Tracked::new(bytes);

    let mut reader = GzipReader::from_reader(source, ReaderOptions::default()).unwrap();
    let failed = loop {
        match reader.load() {
            Ok(true) => continue,
            Ok(false) => break false,
            Err(_) => break true,
        }
    };
    assert!(failed);
    assert_eq!(drops.load(Ordering::SeqCst), 0);

    drop(reader);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_released_once_when_consumer_unwinds() {
    let (source, drops) = Tracked::new(gzip(b"abc"));
    let reader = GzipReader::from_reader(source, ReaderOptions::default()).unwrap();

    let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
        let mut reader = reader;
        reader.load().unwrap();
        panic!("consumer gave up");
    }));
    assert!(outcome.is_err());
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_file_reusable_after_each_exit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reuse.gz");

    // Normal exhaustion.
    std::fs::write(&path, gzip(b"round one")).unwrap();
    {
        let mut reader = GzipFileReader::open(&path).unwrap();
        while reader.load().unwrap() {}
    }
    std::fs::write(&path, b"not gzip anymore").unwrap();

    // Construction failure.
    assert!(GzipFileReader::open(&path).unwrap_err().is_open());

    // Decode failure.
    let mut truncated = gzip(&[9u8; 5000]);
    truncated.truncate(truncated.len() - 3);
    std::fs::write(&path, truncated).unwrap();
    {
        let mut reader = GzipFileReader::open(&path).unwrap();
        let mut result = reader.load();
        while let Ok(true) = result {
            result = reader.load();
        }
        assert!(result.unwrap_err().is_decode());
    }

    // Nothing holds the file: it can be rewritten, removed and recreated.
    std::fs::write(&path, gzip(b"round two")).unwrap();
    std::fs::remove_file(&path).unwrap();
    std::fs::write(&path, gzip(b"round three")).unwrap();
    let reader = GzipFileReader::open(&path).unwrap();
    assert_eq!(byteme_core::read_to_vec(reader).unwrap(), b"round three");
}
