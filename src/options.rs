//! Decompression options.

/// Default output budget: 16 MiB.
pub const DEFAULT_MAX_SIZE: usize = 16 * 1024 * 1024;

/// Options controlling limits and integrity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateOptions {
    /// Maximum number of decompressed bytes. Going over is an error, never a
    /// truncation. For multi-member gzip this caps the total of all members.
    pub max_size: usize,
    /// Verify the gzip CRC32 and zlib Adler-32 trailers.
    pub verify_checksums: bool,
    /// Verify the gzip FHCRC header checksum when present.
    pub verify_header_crc: bool,
    /// Reject stored blocks whose NLEN is not the one's complement of LEN.
    pub strict_stored_length: bool,
}

impl Default for InflateOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            verify_checksums: true,
            verify_header_crc: true,
            strict_stored_length: true,
        }
    }
}

impl InflateOptions {
    /// All integrity checks on (same as `default()`).
    pub fn strict() -> Self {
        Self::default()
    }

    /// Parse checksums and NLEN but do not validate them.
    pub fn lenient() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            verify_checksums: false,
            verify_header_crc: false,
            strict_stored_length: false,
        }
    }

    /// Replace the output budget.
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Turn trailer and header checksum verification on or off.
    #[must_use]
    pub fn with_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self.verify_header_crc = verify;
        self
    }
}
