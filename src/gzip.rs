//! gzip container (RFC 1952).
//!
//! A gzip file is one or more members, each a header, a DEFLATE stream and
//! an 8-byte trailer (CRC32, ISIZE). Members are decoded back to back and
//! their outputs concatenated; the output budget covers all of them together.

use log::debug;

use crate::checksum::crc32;
use crate::decode::bit_reader::BitReader;
use crate::decode::{inflate_with_options, InflateStats};
use crate::error::{ChecksumKind, Error, Result};
use crate::options::InflateOptions;

const ID1: u8 = 0x1F;
const ID2: u8 = 0x8B;
const CM_DEFLATE: u8 = 8;

/// Header flag: payload is probably ASCII text.
pub const FTEXT: u8 = 0x01;
/// Header flag: a CRC16 of the header follows the optional fields.
pub const FHCRC: u8 = 0x02;
/// Header flag: a length-prefixed extra field is present.
pub const FEXTRA: u8 = 0x04;
/// Header flag: a zero-terminated original file name is present.
pub const FNAME: u8 = 0x08;
/// Header flag: a zero-terminated comment is present.
pub const FCOMMENT: u8 = 0x10;
const FRESERVED: u8 = 0xE0;

/// Parsed gzip member header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GzipHeader {
    /// FLG byte.
    pub flags: u8,
    /// Modification time, seconds since the Unix epoch (0 = unknown).
    pub mtime: u32,
    /// Extra flags: 2 = best compression, 4 = fastest, 0 = unspecified.
    pub xfl: u8,
    /// Operating system the member was written on.
    pub os: u8,
    /// FEXTRA payload.
    pub extra: Option<Vec<u8>>,
    /// FNAME bytes without the terminator (ISO 8859-1).
    pub filename: Option<Vec<u8>>,
    /// FCOMMENT bytes without the terminator (ISO 8859-1).
    pub comment: Option<Vec<u8>>,
    /// FHCRC value.
    pub header_crc: Option<u16>,
}

impl GzipHeader {
    /// Parse a member header starting at byte `offset`.
    ///
    /// Returns the header and the offset of the DEFLATE stream that follows.
    /// With `verify_crc`, an FHCRC field is checked against the low 16 bits
    /// of the CRC32 of the header bytes before it.
    pub fn parse(data: &[u8], offset: usize, verify_crc: bool) -> Result<(Self, usize)> {
        let mut reader = BitReader::at_byte(data, offset);
        let fixed = reader.read_bytes(10)?;

        if fixed[0] != ID1 || fixed[1] != ID2 {
            return Err(Error::InvalidHeader(format!(
                "bad gzip magic {:02X} {:02X}",
                fixed[0], fixed[1]
            )));
        }
        if fixed[2] != CM_DEFLATE {
            return Err(Error::Unsupported(format!(
                "gzip compression method {}",
                fixed[2]
            )));
        }

        let flags = fixed[3];
        if flags & FRESERVED != 0 {
            return Err(Error::InvalidHeader(format!(
                "reserved gzip flag bits set: {flags:#04x}"
            )));
        }

        let xfl = fixed[8];
        if !matches!(xfl, 0 | 2 | 4) {
            return Err(Error::InvalidHeader(format!("invalid gzip XFL {xfl}")));
        }

        let mut header = GzipHeader {
            flags,
            mtime: u32::from_le_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]),
            xfl,
            os: fixed[9],
            ..Default::default()
        };

        if flags & FEXTRA != 0 {
            let xlen = reader.read_u16_le()?;
            header.extra = Some(reader.read_bytes(xlen as usize)?.to_vec());
        }
        if flags & FNAME != 0 {
            header.filename = Some(read_zero_terminated(&mut reader, "file name")?);
        }
        if flags & FCOMMENT != 0 {
            header.comment = Some(read_zero_terminated(&mut reader, "comment")?);
        }
        if flags & FHCRC != 0 {
            let covered = &data[offset..reader.byte_offset()];
            let stored = reader.read_u16_le()?;
            if verify_crc {
                let actual = crc32(covered) & 0xFFFF;
                if actual != stored as u32 {
                    return Err(Error::ChecksumMismatch {
                        kind: ChecksumKind::HeaderCrc16,
                        expected: stored as u32,
                        actual,
                    });
                }
            }
            header.header_crc = Some(stored);
        }

        Ok((header, reader.byte_offset()))
    }

    /// FTEXT flag.
    pub fn is_text(&self) -> bool {
        self.flags & FTEXT != 0
    }

    /// File name decoded from ISO 8859-1.
    pub fn filename_lossy(&self) -> Option<String> {
        self.filename.as_deref().map(latin1)
    }

    /// Comment decoded from ISO 8859-1.
    pub fn comment_lossy(&self) -> Option<String> {
        self.comment.as_deref().map(latin1)
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn read_zero_terminated(reader: &mut BitReader, what: &str) -> Result<Vec<u8>> {
    let len = reader
        .remaining()
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::InvalidHeader(format!("unterminated gzip {what}")))?;
    let bytes = reader.read_bytes(len + 1)?;
    Ok(bytes[..len].to_vec())
}

/// One decoded gzip member, without its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipMember {
    /// Parsed header.
    pub header: GzipHeader,
    /// Byte offset of the member header.
    pub offset: usize,
    /// Byte offset just past the member trailer.
    pub end_offset: usize,
    /// Size of the DEFLATE stream in bytes.
    pub compressed_len: usize,
    /// Decompressed size in bytes.
    pub size: usize,
    /// CRC32 from the trailer.
    pub crc32: u32,
    /// Block statistics from inflating the member.
    pub stats: InflateStats,
}

/// Decode the member at `offset`, checking its trailer.
fn read_member(
    data: &[u8],
    offset: usize,
    options: &InflateOptions,
) -> Result<(GzipMember, Vec<u8>)> {
    let (header, body) = GzipHeader::parse(data, offset, options.verify_header_crc)?;
    debug!(
        "gzip member at {}: name={:?} mtime={} os={}",
        offset,
        header.filename_lossy(),
        header.mtime,
        header.os
    );

    let inflated = inflate_with_options(data, body, options)?;

    let mut reader = BitReader::at_byte(data, inflated.end_offset);
    let stored_crc = reader.read_u32_le()?;
    let stored_size = reader.read_u32_le()?;

    if options.verify_checksums {
        let actual = crc32(&inflated.data);
        if actual != stored_crc {
            return Err(Error::ChecksumMismatch {
                kind: ChecksumKind::Crc32,
                expected: stored_crc,
                actual,
            });
        }
    }

    // ISIZE is the length modulo 2^32.
    let actual_size = inflated.data.len() as u32;
    if stored_size != actual_size {
        return Err(Error::SizeMismatch {
            expected: stored_size,
            actual: actual_size,
        });
    }

    let member = GzipMember {
        header,
        offset,
        end_offset: reader.byte_offset(),
        compressed_len: inflated.end_offset - body,
        size: inflated.data.len(),
        crc32: stored_crc,
        stats: inflated.stats,
    };
    Ok((member, inflated.data))
}

/// Returns `true` once nothing but zero padding is left after a member.
fn at_end(data: &[u8], offset: usize) -> bool {
    let rest = data.get(offset..).unwrap_or(&[]);
    if rest.is_empty() {
        return true;
    }
    if rest.iter().all(|&b| b == 0) {
        debug!("gzip: ignoring {} bytes of trailing zero padding", rest.len());
        return true;
    }
    false
}

/// Decompress a gzip stream of one or more members.
///
/// `max_size` caps the combined output of all members.
///
/// # Example
///
/// ```rust
/// let mut gz = vec![0x1F, 0x8B, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0x03];
/// gz.extend_from_slice(&[0x01, 0x02, 0x00, 0xFD, 0xFF, b'h', b'i']);
/// gz.extend_from_slice(&zinflate::checksum::crc32(b"hi").to_le_bytes());
/// gz.extend_from_slice(&2u32.to_le_bytes());
///
/// assert_eq!(zinflate::gzip_decompress(&gz, 1024).unwrap(), b"hi");
/// ```
pub fn gzip_decompress(data: &[u8], max_size: usize) -> Result<Vec<u8>> {
    gzip_decompress_with_options(data, &InflateOptions::default().with_max_size(max_size))
}

/// Decompress a gzip stream with explicit options.
pub fn gzip_decompress_with_options(data: &[u8], options: &InflateOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut offset = 0;

    loop {
        let budget = options.with_max_size(options.max_size - output.len());
        let (member, bytes) = read_member(data, offset, &budget)?;

        if output.is_empty() {
            output = bytes;
        } else {
            output.extend_from_slice(&bytes);
        }

        offset = member.end_offset;
        if at_end(data, offset) {
            break;
        }
    }

    Ok(output)
}

/// Decode every member and return their headers and sizes.
///
/// Useful for listing; the decompressed data is discarded.
pub fn gzip_members(data: &[u8], options: &InflateOptions) -> Result<Vec<GzipMember>> {
    let mut members = Vec::new();
    let mut offset = 0;

    loop {
        let (member, _) = read_member(data, offset, options)?;
        offset = member.end_offset;
        members.push(member);
        if at_end(data, offset) {
            break;
        }
    }

    Ok(members)
}
