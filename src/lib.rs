//! # zinflate
//!
//! A minimal-dependency DEFLATE decompressor with zlib and gzip framing.
//!
//! The decoder works on a complete in-memory stream: bounds are checked once
//! per decode step rather than per bit, so the input must extend a few bytes
//! past the end of the DEFLATE bitstream. zlib and gzip trailers always do.
//!
//! ## Features
//!
//! - **RFC 1951 inflate**: stored, fixed-Huffman and dynamic-Huffman blocks
//! - **RFC 1950 zlib** and **RFC 1952 gzip** (multi-member) containers
//! - CRC32 / Adler-32 trailer verification, optional
//! - Hard output budget against decompression bombs
//! - Optional `zinflate` command-line tool via the `cli` feature
//!
//! ## Example
//!
//! ```rust
//! use zinflate::{decompress, InflateOptions};
//!
//! // zlib stream for "ab" (fixed-Huffman block) with its Adler-32 trailer.
//! let z = [0x78, 0x9C, 0x4B, 0x4C, 0x02, 0x00, 0x01, 0x26, 0x00, 0xC4];
//! let out = decompress(&z, &InflateOptions::default()).unwrap();
//! assert_eq!(out, b"ab");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checksum;
pub mod decode;
pub mod error;
pub mod format;
pub mod gzip;
pub mod options;
pub mod zlib;

pub use decode::{inflate, inflate_with_options, InflateOutput, InflateStats};
pub use error::{Error, Result};
pub use format::{decompress, decompress_as, Format};
pub use gzip::{
    gzip_decompress, gzip_decompress_with_options, gzip_members, GzipHeader, GzipMember,
};
pub use options::{InflateOptions, DEFAULT_MAX_SIZE};
pub use zlib::{zlib_decompress, zlib_decompress_with_options, ZlibHeader};
