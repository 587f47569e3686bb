//! Container detection and a single entry point for all formats.

use std::fmt;
use std::str::FromStr;

use crate::decode::inflate_with_options;
use crate::error::{Error, Result};
use crate::gzip::gzip_decompress_with_options;
use crate::options::InflateOptions;
use crate::zlib::{zlib_decompress_with_options, ZlibHeader};

/// Compressed stream framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// gzip members (RFC 1952).
    Gzip,
    /// zlib stream (RFC 1950).
    Zlib,
    /// Bare DEFLATE stream (RFC 1951).
    Deflate,
}

impl Format {
    /// Guess the container from its first bytes.
    ///
    /// Raw DEFLATE has no signature and is never detected.
    pub fn detect(data: &[u8]) -> Option<Format> {
        match data {
            [0x1F, 0x8B, ..] => Some(Format::Gzip),
            &[cmf, flg, ..] => {
                let header = ZlibHeader { cmf, flg };
                (header.checksum_ok() && header.compression_method() == 8)
                    .then_some(Format::Zlib)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Gzip => f.write_str("gzip"),
            Format::Zlib => f.write_str("zlib"),
            Format::Deflate => f.write_str("deflate"),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" | "gz" => Ok(Format::Gzip),
            "zlib" => Ok(Format::Zlib),
            "deflate" | "raw" => Ok(Format::Deflate),
            other => Err(Error::Unsupported(format!("format '{other}'"))),
        }
    }
}

/// Decompress gzip or zlib data, detecting which from the header.
pub fn decompress(data: &[u8], options: &InflateOptions) -> Result<Vec<u8>> {
    let format = Format::detect(data)
        .ok_or_else(|| Error::InvalidHeader("unrecognized container format".into()))?;
    decompress_as(data, format, options)
}

/// Decompress data in a known format.
pub fn decompress_as(data: &[u8], format: Format, options: &InflateOptions) -> Result<Vec<u8>> {
    match format {
        Format::Gzip => gzip_decompress_with_options(data, options),
        Format::Zlib => zlib_decompress_with_options(data, options),
        Format::Deflate => inflate_with_options(data, 0, options).map(|out| out.data),
    }
}
