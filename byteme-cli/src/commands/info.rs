//! Info command implementation.

use byteme_gzip::{AnyFileReader, GzipHeader, SourceFormat};
use serde::Serialize;
use std::path::Path;

/// JSON serializable gzip header.
#[derive(Debug, Serialize)]
struct HeaderJson {
    method: u8,
    flags: u8,
    text: bool,
    mtime: u32,
    xfl: u8,
    os: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_crc: Option<u16>,
}

impl HeaderJson {
    fn from_header(header: &GzipHeader) -> Self {
        Self {
            method: header.method,
            flags: header.flags,
            text: header.is_text(),
            mtime: header.mtime,
            xfl: header.xfl,
            os: header.os_name().to_string(),
            filename: header.filename.clone(),
            comment: header.comment.clone(),
            extra_len: header.extra.as_ref().map(Vec::len),
            header_crc: header.header_crc,
        }
    }
}

/// JSON output for the info command.
#[derive(Debug, Serialize)]
struct InfoJson {
    file: String,
    format: String,
    mime_type: String,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<HeaderJson>,
}

pub fn cmd_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(file)?;
    // Opening validates the gzip header; nothing is decoded.
    let reader = AnyFileReader::open(file)?;
    let format = reader.format();
    let header = match &reader {
        AnyFileReader::Gzip(gzip) => Some(gzip.header().clone()),
        AnyFileReader::Plain(_) => None,
    };
    drop(reader);

    if json {
        let output = InfoJson {
            file: file.display().to_string(),
            format: format.to_string(),
            mime_type: format.mime_type().to_string(),
            size: metadata.len(),
            header: header.as_ref().map(HeaderJson::from_header),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("File Information");
    println!("================");
    println!("File: {}", file.display());
    println!("Format: {}", format);
    println!("Size: {} bytes", metadata.len());
    println!("MIME type: {}", format.mime_type());

    if let (SourceFormat::Gzip, Some(header)) = (format, header) {
        println!();
        println!("GZIP Header:");
        println!("  Method: {} (deflate)", header.method);
        println!("  Flags: {:#04x}", header.flags);
        println!("  OS: {}", header.os_name());
        if let Some(name) = &header.filename {
            println!("  Original filename: {}", name);
        }
        if let Some(comment) = &header.comment {
            println!("  Comment: {}", comment);
        }
        if header.mtime > 0 {
            println!("  Modification time: {} (Unix timestamp)", header.mtime);
        }
        if let Some(extra) = &header.extra {
            println!("  Extra field: {} bytes", extra.len());
        }
        if let Some(crc) = header.header_crc {
            println!("  Header CRC16: {:#06x}", crc);
        }
    }

    Ok(())
}
