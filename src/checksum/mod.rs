//! Container trailer checksums.

pub mod adler32;
pub mod crc32;

pub use adler32::adler32;
pub use crc32::{crc32, crc32_update};
