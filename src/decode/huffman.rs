//! Canonical Huffman decoding (RFC 1951 section 3.2.2).
//!
//! A [`HuffmanTree`] is built from per-symbol code lengths alone. Decoding
//! walks the canonical code one bit at a time; codes short enough to fit the
//! lookup table are resolved in a single peek first.

use std::sync::LazyLock;

use super::bit_reader::BitReader;
use super::tables::MAX_BITS;
use crate::error::{Error, Result};

/// Upper bound on the lookup table width.
/// Codes longer than this go through the bit-serial walk.
const LOOKUP_BITS: u32 = 9;

/// Decoder for one canonical Huffman code.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    /// Number of codes of each length; index 0 is unused.
    counts: [u16; MAX_BITS + 1],
    /// Symbols ordered by (code length, symbol index), i.e. canonical code order.
    symbols: Vec<u16>,
    /// Indexed by the next `lookup_bits` input bits.
    /// Entry: low 12 bits = symbol, bits 12-15 = code length, 0 = not resolved.
    lookup: Vec<u16>,
    lookup_bits: u32,
    max_len: u32,
}

impl HuffmanTree {
    /// Build a tree from code lengths, where `lengths[symbol]` is in `0..=15`
    /// and 0 marks an unused symbol.
    ///
    /// Over-subscribed length sets are rejected. Incomplete sets are accepted
    /// because DEFLATE allows a single distance code of length one.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        if lengths.len() > 0x1000 {
            return Err(Error::InvalidCodeLengths("too many symbols".into()));
        }
        if let Some(&len) = lengths.iter().find(|&&len| len as usize > MAX_BITS) {
            return Err(Error::InvalidCodeLengths(format!(
                "code length {len} exceeds {MAX_BITS}"
            )));
        }

        let counts = count_lengths(lengths);

        // Kraft inequality: never hand out more codes of a length than remain.
        let mut left: i32 = 1;
        for &count in &counts[1..] {
            left = (left << 1) - count as i32;
            if left < 0 {
                return Err(Error::InvalidCodeLengths("over-subscribed code".into()));
            }
        }

        Ok(Self::build(lengths))
    }

    /// Build without validation; only for the known-good fixed tables.
    fn build(lengths: &[u8]) -> Self {
        let counts = count_lengths(lengths);
        let max_len = (1..=MAX_BITS)
            .rev()
            .find(|&len| counts[len] != 0)
            .unwrap_or(0) as u32;

        // Offset of the first symbol of each length within `symbols`.
        let mut offsets = [0usize; MAX_BITS + 2];
        for len in 1..=MAX_BITS {
            offsets[len + 1] = offsets[len] + counts[len] as usize;
        }
        let mut symbols = vec![0u16; offsets[MAX_BITS + 1]];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len != 0 {
                symbols[offsets[len as usize]] = symbol as u16;
                offsets[len as usize] += 1;
            }
        }

        // First canonical code of each length.
        let mut next_code = [0u32; MAX_BITS + 1];
        let mut code = 0u32;
        for len in 1..=MAX_BITS {
            code = (code + counts[len - 1] as u32) << 1;
            next_code[len] = code;
        }

        let lookup_bits = max_len.min(LOOKUP_BITS);
        let mut lookup = vec![0u16; 1 << lookup_bits];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let code = next_code[len as usize];
            next_code[len as usize] += 1;

            let len = len as u32;
            if len > lookup_bits {
                continue;
            }

            // Input arrives LSB-first, so the table is keyed by the reversed code.
            let reversed = reverse_bits(code, len) as usize;
            let entry = symbol as u16 | ((len as u16) << 12);
            for fill in 0..(1usize << (lookup_bits - len)) {
                lookup[reversed | (fill << len)] = entry;
            }
        }

        Self {
            counts,
            symbols,
            lookup,
            lookup_bits,
            max_len,
        }
    }

    /// Decode one symbol.
    ///
    /// The caller must have checked that at least [`max_len`](Self::max_len)
    /// bits are available.
    #[inline]
    pub fn get_symbol(&self, reader: &mut BitReader) -> Result<u16> {
        if self.is_empty() {
            return Err(Error::InvalidHuffmanCode);
        }

        let entry = self.lookup[reader.peek_bits(self.lookup_bits)];
        if entry != 0 {
            reader.consume((entry >> 12) as u32);
            return Ok(entry & 0xFFF);
        }

        self.get_symbol_slow(reader)
    }

    /// Bit-serial canonical walk: after each bit, check whether the code read
    /// so far falls inside the range assigned to the current length.
    fn get_symbol_slow(&self, reader: &mut BitReader) -> Result<u16> {
        let mut code = 0usize;
        let mut first = 0usize;
        let mut index = 0usize;
        for len in 1..=self.max_len as usize {
            code |= reader.get_bit() as usize;
            let count = self.counts[len] as usize;
            if code < first + count {
                return Ok(self.symbols[index + code - first]);
            }
            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }
        Err(Error::InvalidHuffmanCode)
    }

    /// Longest code length in the tree, 0 if the tree is empty.
    pub fn max_len(&self) -> u32 {
        self.max_len
    }

    /// Returns `true` if no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.max_len == 0
    }
}

fn count_lengths(lengths: &[u8]) -> [u16; MAX_BITS + 1] {
    let mut counts = [0u16; MAX_BITS + 1];
    for &len in lengths {
        if len != 0 {
            counts[len as usize] += 1;
        }
    }
    counts
}

/// Reverse the low `length` bits of `value`.
fn reverse_bits(value: u32, length: u32) -> u32 {
    value.reverse_bits() >> (32 - length)
}

static FIXED_LITERAL_TREE: LazyLock<HuffmanTree> = LazyLock::new(|| {
    let mut lengths = [0u8; 288];
    lengths[..144].fill(8);
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths[280..].fill(8);
    HuffmanTree::build(&lengths)
});

static FIXED_DISTANCE_TREE: LazyLock<HuffmanTree> =
    LazyLock::new(|| HuffmanTree::build(&[5u8; 32]));

/// Literal/length tree for BTYPE = 01 blocks.
pub fn fixed_literal_tree() -> &'static HuffmanTree {
    &FIXED_LITERAL_TREE
}

/// Distance tree for BTYPE = 01 blocks.
pub fn fixed_distance_tree() -> &'static HuffmanTree {
    &FIXED_DISTANCE_TREE
}
