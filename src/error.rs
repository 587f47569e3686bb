//! Error types for the zinflate library.
//!
//! Every variant is a parse error: decompression never recovers locally,
//! the whole call is aborted and the error is handed back to the caller.

use std::fmt;

/// Result type alias for zinflate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which checksum failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    /// gzip member trailer CRC32.
    Crc32,
    /// gzip FHCRC header checksum (low 16 bits of CRC32).
    HeaderCrc16,
    /// zlib trailer Adler-32.
    Adler32,
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChecksumKind::Crc32 => f.write_str("CRC32"),
            ChecksumKind::HeaderCrc16 => f.write_str("header CRC16"),
            ChecksumKind::Adler32 => f.write_str("Adler32"),
        }
    }
}

/// Which alphabet a decoded symbol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Literal/length alphabet (0-285).
    LiteralLength,
    /// Distance alphabet (0-29).
    Distance,
    /// Code-length alphabet (0-18).
    CodeLength,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::LiteralLength => f.write_str("literal/length"),
            SymbolKind::Distance => f.write_str("distance"),
            SymbolKind::CodeLength => f.write_str("code length"),
        }
    }
}

/// Errors that can occur while decompressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read would run past the end of the input.
    UnexpectedEof {
        /// Number of bits the failed step required.
        needed_bits: usize,
        /// Bit offset at which the read was attempted.
        bit_offset: usize,
    },
    /// Decompressed output would exceed the caller's budget.
    OutputLimitExceeded {
        /// The configured maximum output size in bytes.
        limit: usize,
    },
    /// Block header carried BTYPE = 11.
    ReservedBlockType,
    /// Stored block NLEN is not the one's complement of LEN.
    StoredLengthMismatch {
        /// LEN field.
        len: u16,
        /// NLEN field.
        nlen: u16,
    },
    /// A code-length table cannot form a valid prefix code.
    InvalidCodeLengths(String),
    /// No code in the Huffman table matched the input bits.
    InvalidHuffmanCode,
    /// Dynamic block's code lengths leave symbol 256 unused.
    MissingEndOfBlock,
    /// A decoded symbol is outside the valid range for its alphabet.
    InvalidSymbol {
        /// Alphabet of the symbol.
        kind: SymbolKind,
        /// Offending symbol value.
        symbol: u16,
    },
    /// A back-reference points before the start of the output.
    DistanceTooFar {
        /// Decoded distance.
        distance: usize,
        /// Bytes of output available at that point.
        available: usize,
    },
    /// Container header is malformed.
    InvalidHeader(String),
    /// Container uses a feature this decoder does not implement.
    Unsupported(String),
    /// A stored checksum does not match the computed one.
    ChecksumMismatch {
        /// Which checksum.
        kind: ChecksumKind,
        /// Value stored in the stream.
        expected: u32,
        /// Value computed from the data.
        actual: u32,
    },
    /// gzip ISIZE does not match the decompressed length mod 2^32.
    SizeMismatch {
        /// ISIZE from the trailer.
        expected: u32,
        /// Actual decompressed length, truncated to 32 bits.
        actual: u32,
    },
}

impl Error {
    /// Returns `true` if the error was caused by the output budget.
    pub fn is_output_limit(&self) -> bool {
        matches!(self, Error::OutputLimitExceeded { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEof {
                needed_bits,
                bit_offset,
            } => {
                write!(
                    f,
                    "Input buffer overrun: needed {} bits at bit offset {}",
                    needed_bits, bit_offset
                )
            }
            Error::OutputLimitExceeded { limit } => {
                write!(f, "Output buffer overrun: exceeds limit of {} bytes", limit)
            }
            Error::ReservedBlockType => write!(f, "Reserved block type"),
            Error::StoredLengthMismatch { len, nlen } => {
                write!(
                    f,
                    "Stored block LEN/NLEN mismatch: LEN={:#06x}, NLEN={:#06x}",
                    len, nlen
                )
            }
            Error::InvalidCodeLengths(msg) => write!(f, "Invalid code lengths: {}", msg),
            Error::InvalidHuffmanCode => write!(f, "Invalid Huffman code"),
            Error::MissingEndOfBlock => {
                write!(f, "The end-of-block symbol must be in the table")
            }
            Error::InvalidSymbol { kind, symbol } => {
                write!(f, "{} symbol out of range: {}", kind, symbol)
            }
            Error::DistanceTooFar {
                distance,
                available,
            } => {
                write!(
                    f,
                    "Distance beyond start of decompressed data: {} > {}",
                    distance, available
                )
            }
            Error::InvalidHeader(msg) => write!(f, "Invalid header: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            Error::ChecksumMismatch {
                kind,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{} mismatch: expected {:08X}, got {:08X}",
                    kind, expected, actual
                )
            }
            Error::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "Decompressed size mismatch: ISIZE {}, actual {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::ReservedBlockType.to_string(), "Reserved block type");
        assert_eq!(
            Error::DistanceTooFar {
                distance: 5,
                available: 2
            }
            .to_string(),
            "Distance beyond start of decompressed data: 5 > 2"
        );
        let err = Error::ChecksumMismatch {
            kind: ChecksumKind::Adler32,
            expected: 0x0102_0304,
            actual: 0xAABB_CCDD,
        };
        assert_eq!(err.to_string(), "Adler32 mismatch: expected 01020304, got AABBCCDD");
    }

    #[test]
    fn test_is_output_limit() {
        assert!(Error::OutputLimitExceeded { limit: 1 }.is_output_limit());
        assert!(!Error::InvalidHuffmanCode.is_output_limit());
    }
}
