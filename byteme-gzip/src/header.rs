//! GZIP member header parsing (RFC 1952).
//!
//! The header is validated eagerly when a handle is acquired, so that a file
//! which is not gzip fails at construction time instead of on the first read.

use std::io::{self, Read};
use thiserror::Error;

/// GZIP magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// GZIP compression method: DEFLATE.
pub const CM_DEFLATE: u8 = 8;

/// GZIP header flags.
pub mod flags {
    /// Text file.
    pub const FTEXT: u8 = 0x01;
    /// Header CRC present.
    pub const FHCRC: u8 = 0x02;
    /// Extra field present.
    pub const FEXTRA: u8 = 0x04;
    /// Original filename present.
    pub const FNAME: u8 = 0x08;
    /// Comment present.
    pub const FCOMMENT: u8 = 0x10;
    /// Bits that must be zero.
    pub const RESERVED: u8 = 0xE0;
}

/// Reasons a byte sequence is not a usable gzip header.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The source holds no bytes at all.
    #[error("empty file")]
    Empty,

    /// The source ended inside the header.
    #[error("truncated gzip header")]
    Truncated,

    /// The first two bytes are not `1f 8b`.
    #[error("not in gzip format: magic bytes {found:02x?}")]
    InvalidMagic {
        /// Bytes found where the magic was expected.
        found: Vec<u8>,
    },

    /// Compression method other than DEFLATE.
    #[error("unsupported gzip compression method {0}")]
    UnsupportedMethod(u8),

    /// Reserved flag bits are set.
    #[error("reserved gzip flag bits set: {0:#04x}")]
    ReservedFlags(u8),

    /// FHCRC present and wrong.
    #[error("gzip header CRC mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    CrcMismatch {
        /// CRC16 stored in the header.
        expected: u16,
        /// CRC16 computed over the header bytes.
        computed: u16,
    },

    /// I/O error from the underlying source.
    #[error("{0}")]
    Io(io::Error),
}

/// GZIP member header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// Compression method (always 8 for DEFLATE once parsed).
    pub method: u8,
    /// Flags.
    pub flags: u8,
    /// Modification time (Unix timestamp, 0 if unknown).
    pub mtime: u32,
    /// Extra flags.
    pub xfl: u8,
    /// Operating system.
    pub os: u8,
    /// Extra field payload (if FEXTRA flag set).
    pub extra: Option<Vec<u8>>,
    /// Original filename (if FNAME flag set).
    pub filename: Option<String>,
    /// Comment (if FCOMMENT flag set).
    pub comment: Option<String>,
    /// Header CRC16 (if FHCRC flag set).
    pub header_crc: Option<u16>,
}

impl Default for GzipHeader {
    fn default() -> Self {
        Self {
            method: CM_DEFLATE,
            flags: 0,
            mtime: 0,
            xfl: 0,
            os: 255, // Unknown OS
            extra: None,
            filename: None,
            comment: None,
            header_crc: None,
        }
    }
}

impl GzipHeader {
    /// Read and validate a header from `reader`.
    ///
    /// Returns the header together with every byte consumed, so the caller
    /// can hand the untouched stream to a decoder.
    pub fn read<R: Read>(reader: &mut R) -> Result<(Self, Vec<u8>), HeaderError> {
        let mut tee = Tee {
            inner: reader,
            seen: Vec::with_capacity(16),
        };
        let header = Self::parse(&mut tee)?;
        Ok((header, tee.seen))
    }

    fn parse<R: Read>(tee: &mut Tee<'_, R>) -> Result<Self, HeaderError> {
        let mut buf = [0u8; 10];
        tee.fill(&mut buf)?;

        if buf[0..2] != GZIP_MAGIC {
            return Err(HeaderError::InvalidMagic {
                found: buf[0..2].to_vec(),
            });
        }

        let method = buf[2];
        if method != CM_DEFLATE {
            return Err(HeaderError::UnsupportedMethod(method));
        }

        let flags = buf[3];
        if flags & flags::RESERVED != 0 {
            return Err(HeaderError::ReservedFlags(flags & flags::RESERVED));
        }

        let mtime = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let xfl = buf[8];
        let os = buf[9];

        let mut extra = None;
        let mut filename = None;
        let mut comment = None;
        let mut header_crc = None;

        if flags & flags::FEXTRA != 0 {
            let mut xlen_buf = [0u8; 2];
            tee.fill(&mut xlen_buf)?;
            let xlen = u16::from_le_bytes(xlen_buf) as usize;
            let mut payload = vec![0u8; xlen];
            tee.fill(&mut payload)?;
            extra = Some(payload);
        }

        if flags & flags::FNAME != 0 {
            filename = Some(latin1(&tee.null_terminated()?));
        }

        if flags & flags::FCOMMENT != 0 {
            comment = Some(latin1(&tee.null_terminated()?));
        }

        if flags & flags::FHCRC != 0 {
            let computed = (crc32fast::hash(&tee.seen) & 0xFFFF) as u16;
            let mut crc_buf = [0u8; 2];
            tee.fill(&mut crc_buf)?;
            let expected = u16::from_le_bytes(crc_buf);
            if expected != computed {
                return Err(HeaderError::CrcMismatch { expected, computed });
            }
            header_crc = Some(expected);
        }

        Ok(Self {
            method,
            flags,
            mtime,
            xfl,
            os,
            extra,
            filename,
            comment,
            header_crc,
        })
    }

    /// Whether the compressor marked the content as probably text.
    pub fn is_text(&self) -> bool {
        self.flags & flags::FTEXT != 0
    }

    /// Name of the operating system the member was written on.
    pub fn os_name(&self) -> &'static str {
        match self.os {
            0 => "FAT",
            1 => "Amiga",
            2 => "VMS",
            3 => "Unix",
            4 => "VM/CMS",
            5 => "Atari TOS",
            6 => "HPFS",
            7 => "Macintosh",
            8 => "Z-System",
            9 => "CP/M",
            10 => "TOPS-20",
            11 => "NTFS",
            12 => "QDOS",
            13 => "Acorn RISCOS",
            _ => "unknown",
        }
    }
}

/// FNAME and FCOMMENT are ISO-8859-1 per RFC 1952: each byte is one code point.
fn latin1(bytes: &[u8]) -> String {
    encoding_rs::mem::decode_latin1(bytes).into_owned()
}

/// Records every byte pulled from the inner reader.
struct Tee<'a, R> {
    inner: &'a mut R,
    seen: Vec<u8>,
}

impl<R: Read> Tee<'_, R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), HeaderError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HeaderError::Io(e)),
            }
        }
        self.seen.extend_from_slice(&buf[..filled]);

        if filled < buf.len() {
            if self.seen.is_empty() {
                return Err(HeaderError::Empty);
            }
            return Err(HeaderError::Truncated);
        }
        Ok(())
    }

    fn null_terminated(&mut self) -> Result<Vec<u8>, HeaderError> {
        let mut bytes = Vec::new();
        let mut buf = [0u8; 1];

        loop {
            self.fill(&mut buf)?;
            if buf[0] == 0 {
                break;
            }
            bytes.push(buf[0]);
        }

        Ok(bytes)
    }
}
