//! zlib container (RFC 1950).
//!
//! Two header bytes (CMF, FLG), a DEFLATE stream, then a big-endian Adler-32
//! of the uncompressed data. Preset dictionaries are not supported.

use log::debug;

use crate::checksum::adler32;
use crate::decode::bit_reader::BitReader;
use crate::decode::inflate_with_options;
use crate::error::{ChecksumKind, Error, Result};
use crate::options::InflateOptions;

const CM_DEFLATE: u8 = 8;
const FDICT: u8 = 0x20;

/// Parsed zlib header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibHeader {
    /// Compression method and info byte.
    pub cmf: u8,
    /// Flags byte.
    pub flg: u8,
}

impl ZlibHeader {
    /// Parse and validate the two header bytes at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let &[cmf, flg, ..] = data else {
            return Err(Error::UnexpectedEof {
                needed_bits: 16,
                bit_offset: 0,
            });
        };
        let header = Self { cmf, flg };

        if !header.checksum_ok() {
            return Err(Error::InvalidHeader("zlib header checksum".into()));
        }
        if header.compression_method() != CM_DEFLATE {
            return Err(Error::Unsupported(format!(
                "zlib compression method {}",
                header.compression_method()
            )));
        }
        if header.window_bits() > 15 {
            return Err(Error::InvalidHeader(format!(
                "zlib window size 2^{}",
                header.window_bits()
            )));
        }
        if header.has_dictionary() {
            return Err(Error::Unsupported("zlib preset dictionary".into()));
        }

        Ok(header)
    }

    /// `CMF * 256 + FLG` is a multiple of 31.
    pub fn checksum_ok(&self) -> bool {
        (u16::from(self.cmf) << 8 | u16::from(self.flg)) % 31 == 0
    }

    /// CM field; 8 is DEFLATE.
    pub fn compression_method(&self) -> u8 {
        self.cmf & 0x0F
    }

    /// Base-2 log of the LZ77 window size (CINFO + 8).
    pub fn window_bits(&self) -> u8 {
        (self.cmf >> 4) + 8
    }

    /// LZ77 window size in bytes.
    pub fn window_size(&self) -> usize {
        1 << self.window_bits()
    }

    /// FLEVEL: 0 = fastest .. 3 = maximum compression.
    pub fn level(&self) -> u8 {
        self.flg >> 6
    }

    /// FDICT flag.
    pub fn has_dictionary(&self) -> bool {
        self.flg & FDICT != 0
    }
}

/// Decompress a zlib stream.
///
/// # Example
///
/// ```rust
/// // zlib stream for "hi" using a stored block.
/// let mut z = vec![0x78, 0x01, 0x01, 0x02, 0x00, 0xFD, 0xFF, b'h', b'i'];
/// z.extend_from_slice(&zinflate::checksum::adler32(b"hi").to_be_bytes());
///
/// assert_eq!(zinflate::zlib_decompress(&z, 1024).unwrap(), b"hi");
/// ```
pub fn zlib_decompress(data: &[u8], max_size: usize) -> Result<Vec<u8>> {
    zlib_decompress_with_options(data, &InflateOptions::default().with_max_size(max_size))
}

/// Decompress a zlib stream with explicit options.
pub fn zlib_decompress_with_options(data: &[u8], options: &InflateOptions) -> Result<Vec<u8>> {
    let header = ZlibHeader::parse(data)?;
    debug!(
        "zlib header: window={} level={}",
        header.window_size(),
        header.level()
    );

    let inflated = inflate_with_options(data, 2, options)?;

    let mut reader = BitReader::at_byte(data, inflated.end_offset);
    let trailer = reader.read_bytes(4)?;
    let stored = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);

    if options.verify_checksums {
        let actual = adler32(&inflated.data);
        if actual != stored {
            return Err(Error::ChecksumMismatch {
                kind: ChecksumKind::Adler32,
                expected: stored,
                actual,
            });
        }
    }

    Ok(inflated.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_zlib(payload: &[u8]) -> Vec<u8> {
        let len = payload.len() as u16;
        let mut out = vec![0x78, 0x01, 0x01];
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&adler32(payload).to_be_bytes());
        out
    }

    #[test]
    fn test_zlib_stored() {
        let z = stored_zlib(b"stored block test data");
        assert_eq!(zlib_decompress(&z, 1024).unwrap(), b"stored block test data");
    }

    #[test]
    fn test_zlib_fixed_ab() {
        let mut z = vec![0x78, 0x9C, 0x4B, 0x4C, 0x02, 0x00];
        z.extend_from_slice(&adler32(b"ab").to_be_bytes());
        assert_eq!(zlib_decompress(&z, 1024).unwrap(), b"ab");
    }

    #[test]
    fn test_zlib_header_fields() {
        let header = ZlibHeader::parse(&[0x78, 0xDA]).unwrap();
        assert_eq!(header.compression_method(), 8);
        assert_eq!(header.window_size(), 32768);
        assert_eq!(header.level(), 3);
        assert!(!header.has_dictionary());
    }

    #[test]
    fn test_zlib_bad_header_checksum() {
        assert!(matches!(
            ZlibHeader::parse(&[0x78, 0x9D]),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_zlib_bad_method() {
        // CM = 7, FCHECK chosen so the header checksum passes.
        let cmf = 0x77u8;
        let flg = (31 - (u16::from(cmf) << 8) % 31) as u8;
        assert!(matches!(
            ZlibHeader::parse(&[cmf, flg]),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_zlib_bad_window() {
        let cmf = 0x88u8;
        let flg = (31 - (u16::from(cmf) << 8) % 31) as u8;
        assert!(matches!(
            ZlibHeader::parse(&[cmf, flg]),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_zlib_preset_dictionary() {
        // 0x78 0xBB: FDICT set, checksum valid.
        assert_eq!((0x78u16 << 8 | 0xBB) % 31, 0);
        assert!(matches!(
            ZlibHeader::parse(&[0x78, 0xBB, 0, 0, 0, 1]),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_zlib_too_short() {
        assert!(zlib_decompress(&[], 1024).is_err());
        assert!(zlib_decompress(&[0x78], 1024).is_err());
    }

    #[test]
    fn test_zlib_invalid_block_type() {
        let z = [0x78, 0x9C, 0x07, 0, 0, 0, 0];
        assert_eq!(zlib_decompress(&z, 1024), Err(Error::ReservedBlockType));
    }

    #[test]
    fn test_zlib_adler_mismatch() {
        let mut z = stored_zlib(b"test data");
        let last = z.len() - 1;
        z[last] ^= 0xFF;
        assert!(matches!(
            zlib_decompress(&z, 1024),
            Err(Error::ChecksumMismatch {
                kind: ChecksumKind::Adler32,
                ..
            })
        ));
        let lenient = InflateOptions::lenient();
        assert_eq!(zlib_decompress_with_options(&z, &lenient).unwrap(), b"test data");
    }

    #[test]
    fn test_zlib_missing_trailer() {
        let z = stored_zlib(b"abc");
        assert!(matches!(
            zlib_decompress(&z[..z.len() - 2], 1024),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_zlib_budget() {
        let z = stored_zlib(&[7u8; 100]);
        assert_eq!(zlib_decompress(&z, 100).unwrap().len(), 100);
        assert!(zlib_decompress(&z, 99).unwrap_err().is_output_limit());
    }
}
