//! Bit-level reader for DEFLATE decoding.
//!
//! DEFLATE packs bits LSB-first within each byte. The reader is nothing more
//! than a borrowed byte slice plus a bit offset; it never buffers ahead, so
//! the offset can be turned back into a byte position at any point.
//!
//! Reads are not bounds-checked one bit at a time. Callers call
//! [`BitReader::ensure_bits`] once with the worst case a decode step can
//! consume and then read freely. Reading past a successful `ensure_bits` is a
//! logic error and panics on the slice index.

use crate::error::{Error, Result};

/// Read bit `*bit_offset` of `data` (LSB-first) and advance the offset by one.
///
/// # Panics
///
/// Panics if `*bit_offset / 8 >= data.len()`.
#[inline]
pub fn get_bit(data: &[u8], bit_offset: &mut usize) -> bool {
    let byte = data[*bit_offset >> 3];
    let bit = (byte >> (*bit_offset & 7)) & 1;
    *bit_offset += 1;
    bit == 1
}

/// Read `count` bits starting at `*bit_offset`, first bit in the low-order
/// position of the result, and advance the offset by `count`.
///
/// # Panics
///
/// Panics if the bits are not all inside `data`, or if `count` exceeds
/// `usize::BITS`.
#[inline]
pub fn get_bits(data: &[u8], bit_offset: &mut usize, count: u32) -> usize {
    debug_assert!(count <= usize::BITS);

    let mut result = 0usize;
    let mut done = 0u32;
    while done < count {
        let shift = (*bit_offset & 7) as u32;
        let take = (8 - shift).min(count - done);
        let bits = (data[*bit_offset >> 3] as usize >> shift) & ((1usize << take) - 1);
        result |= bits << done;
        done += take;
        *bit_offset += take as usize;
    }
    result
}

/// Bit reader for LSB-first bit streams.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Create a bit reader positioned at byte `offset`.
    ///
    /// An offset past the end of `data` is not an error here; the first
    /// read reports it as [`Error::UnexpectedEof`].
    pub fn at_byte(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            bit_pos: offset.saturating_mul(8),
        }
    }

    /// Check that at least `n` more bits are present in the input.
    ///
    /// This is the one bounds check behind every batch of unchecked reads.
    #[inline]
    pub fn ensure_bits(&self, n: usize) -> Result<()> {
        match self.bit_pos.checked_add(n) {
            Some(end) if end.div_ceil(8) <= self.data.len() => Ok(()),
            _ => Err(Error::UnexpectedEof {
                needed_bits: n,
                bit_offset: self.bit_pos,
            }),
        }
    }

    /// Read a single bit.
    #[inline]
    pub fn get_bit(&mut self) -> bool {
        get_bit(self.data, &mut self.bit_pos)
    }

    /// Read `n` bits LSB-first.
    #[inline]
    pub fn get_bits(&mut self, n: u32) -> usize {
        get_bits(self.data, &mut self.bit_pos, n)
    }

    /// Look at the next `n` bits without consuming them.
    #[inline]
    pub fn peek_bits(&self, n: u32) -> usize {
        let mut pos = self.bit_pos;
        get_bits(self.data, &mut pos, n)
    }

    /// Skip `n` bits that were already inspected with [`peek_bits`](Self::peek_bits).
    #[inline]
    pub fn consume(&mut self, n: u32) {
        self.bit_pos += n as usize;
    }

    /// Align to the next byte boundary, discarding the rest of a partial byte.
    pub fn align_to_byte(&mut self) {
        self.bit_pos = self.byte_offset().saturating_mul(8);
    }

    /// Read a little-endian `u16` at the current (byte-aligned) position.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        debug_assert_eq!(self.bit_pos & 7, 0);
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian `u32` at the current (byte-aligned) position.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Bytes from the current position (rounded up) to the end of the input.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.byte_offset()..).unwrap_or(&[])
    }

    /// Borrow the next `len` bytes and advance past them (assumes byte-aligned).
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        debug_assert_eq!(self.bit_pos & 7, 0);
        let start = self.bit_pos >> 3;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::UnexpectedEof {
                needed_bits: len.saturating_mul(8),
                bit_offset: self.bit_pos,
            })?;
        self.bit_pos = end * 8;
        Ok(&self.data[start..end])
    }

    /// Current position in bits.
    pub fn bit_offset(&self) -> usize {
        self.bit_pos
    }

    /// Current position rounded up to a whole byte.
    pub fn byte_offset(&self) -> usize {
        self.bit_pos.div_ceil(8)
    }
}
