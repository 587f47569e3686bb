//! Adler-32 checksum (RFC 1950), as stored in zlib trailers.

const MOD_ADLER: u32 = 65_521;

/// Largest n such that 255*n*(n+1)/2 + (n+1)*(MOD_ADLER-1) <= 2^32-1:
/// the number of bytes that can be summed before a modulo is required.
const NMAX: usize = 5552;

/// Calculate the Adler-32 checksum of `data`.
#[inline]
#[must_use]
pub fn adler32(data: &[u8]) -> u32 {
    let mut s1: u32 = 1;
    let mut s2: u32 = 0;

    for chunk in data.chunks(NMAX) {
        for &b in chunk {
            s1 += b as u32;
            s2 += s1;
        }
        s1 %= MOD_ADLER;
        s2 %= MOD_ADLER;
    }

    (s2 << 16) | s1
}
