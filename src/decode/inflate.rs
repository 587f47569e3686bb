//! DEFLATE decompression (RFC 1951).
//!
//! The whole compressed stream must be in memory. Bounds are checked once per
//! decode step against the worst case that step can read, so the input must
//! extend at least 4 bytes past the end of the bitstream; the zlib and gzip
//! trailers provide this for free.

use log::{debug, trace};

use super::bit_reader::BitReader;
use super::huffman::{fixed_distance_tree, fixed_literal_tree, HuffmanTree};
use super::tables::{
    CODE_LENGTH_ORDER, DISTANCE_BASE, DISTANCE_EXTRA, END_OF_BLOCK, LENGTH_BASE, LENGTH_EXTRA,
    MAX_BITS, MAX_CODE_LENGTH_BITS, MAX_DISTANCE_CODES, MAX_DISTANCE_EXTRA, MAX_LENGTH_EXTRA,
    MAX_LITERAL_CODES,
};
use crate::error::{Error, Result, SymbolKind};
use crate::options::InflateOptions;

/// DEFLATE block type (BTYPE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// 00: uncompressed.
    Stored,
    /// 01: fixed Huffman codes.
    Fixed,
    /// 10: dynamic Huffman codes.
    Dynamic,
}

/// Counters gathered while inflating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InflateStats {
    /// Number of stored blocks.
    pub stored_blocks: usize,
    /// Number of fixed-Huffman blocks.
    pub fixed_blocks: usize,
    /// Number of dynamic-Huffman blocks.
    pub dynamic_blocks: usize,
    /// Literal bytes decoded from Huffman blocks.
    pub literals: usize,
    /// Length/distance pairs decoded.
    pub matches: usize,
}

impl InflateStats {
    /// Total number of blocks.
    pub fn blocks(&self) -> usize {
        self.stored_blocks + self.fixed_blocks + self.dynamic_blocks
    }
}

/// Result of a successful [`inflate_with_options`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflateOutput {
    /// Decompressed bytes.
    pub data: Vec<u8>,
    /// Byte offset just past the compressed stream (final bit rounded up).
    pub end_offset: usize,
    /// Block and symbol counters.
    pub stats: InflateStats,
}

/// Inflate the raw DEFLATE stream starting at byte `offset` of `data`.
///
/// Returns the decompressed bytes and the byte offset just past the stream,
/// where a container trailer would start. Fails if the output would grow
/// beyond `max_size` bytes.
///
/// # Example
///
/// ```rust
/// // Fixed-Huffman block for "ab", followed by 4 bytes of trailer.
/// let data = [0x4B, 0x4C, 0x02, 0x00, 0, 0, 0, 0];
/// let (out, end) = zinflate::inflate(&data, 0, 1024).unwrap();
/// assert_eq!(out, b"ab");
/// assert_eq!(end, 4);
/// ```
pub fn inflate(data: &[u8], offset: usize, max_size: usize) -> Result<(Vec<u8>, usize)> {
    let options = InflateOptions::default().with_max_size(max_size);
    let output = inflate_with_options(data, offset, &options)?;
    Ok((output.data, output.end_offset))
}

/// Inflate with explicit options, also returning block statistics.
pub fn inflate_with_options(
    data: &[u8],
    offset: usize,
    options: &InflateOptions,
) -> Result<InflateOutput> {
    let mut inflater = Inflater::new(data, offset, options);

    loop {
        let (is_final, block_type) = inflater.read_block_header()?;
        let before = inflater.output.len();

        match block_type {
            BlockType::Stored => inflater.inflate_stored()?,
            BlockType::Fixed => inflater.inflate_fixed()?,
            BlockType::Dynamic => inflater.inflate_dynamic()?,
        }

        debug!(
            "inflate: {:?} block (final={}) produced {} bytes",
            block_type,
            is_final,
            inflater.output.len() - before
        );

        if is_final {
            break;
        }
    }

    Ok(InflateOutput {
        end_offset: inflater.reader.byte_offset(),
        data: inflater.output,
        stats: inflater.stats,
    })
}

/// Decoder state for one `inflate` call.
struct Inflater<'a> {
    reader: BitReader<'a>,
    output: Vec<u8>,
    max_size: usize,
    strict_stored_length: bool,
    stats: InflateStats,
}

impl<'a> Inflater<'a> {
    fn new(data: &'a [u8], offset: usize, options: &InflateOptions) -> Self {
        let remaining = data.len().saturating_sub(offset);
        Self {
            reader: BitReader::at_byte(data, offset),
            output: Vec::with_capacity(remaining.saturating_mul(4).min(options.max_size)),
            max_size: options.max_size,
            strict_stored_length: options.strict_stored_length,
            stats: InflateStats::default(),
        }
    }

    /// Read BFINAL and BTYPE.
    fn read_block_header(&mut self) -> Result<(bool, BlockType)> {
        self.reader.ensure_bits(3)?;
        let is_final = self.reader.get_bit();
        let block_type = match self.reader.get_bits(2) {
            0 => BlockType::Stored,
            1 => BlockType::Fixed,
            2 => BlockType::Dynamic,
            _ => return Err(Error::ReservedBlockType),
        };
        Ok((is_final, block_type))
    }

    fn check_output(&self, additional: usize) -> Result<()> {
        if self.output.len() + additional > self.max_size {
            return Err(Error::OutputLimitExceeded {
                limit: self.max_size,
            });
        }
        Ok(())
    }

    /// Inflate a stored (uncompressed) block.
    fn inflate_stored(&mut self) -> Result<()> {
        self.stats.stored_blocks += 1;
        self.reader.align_to_byte();

        let len = self.reader.read_u16_le()?;
        let nlen = self.reader.read_u16_le()?;
        if self.strict_stored_length && len != !nlen {
            return Err(Error::StoredLengthMismatch { len, nlen });
        }

        let bytes = self.reader.read_bytes(len as usize)?;
        self.check_output(bytes.len())?;
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    /// Inflate a block with fixed Huffman codes.
    fn inflate_fixed(&mut self) -> Result<()> {
        self.stats.fixed_blocks += 1;
        self.inflate_block(fixed_literal_tree(), fixed_distance_tree())
    }

    /// Inflate a block with dynamic Huffman codes.
    fn inflate_dynamic(&mut self) -> Result<()> {
        self.stats.dynamic_blocks += 1;

        self.reader.ensure_bits(14)?;
        let num_literal_codes = self.reader.get_bits(5) + 257;
        let num_distance_codes = self.reader.get_bits(5) + 1;
        let num_code_length_codes = self.reader.get_bits(4) + 4;
        trace!(
            "dynamic block: HLIT={} HDIST={} HCLEN={}",
            num_literal_codes,
            num_distance_codes,
            num_code_length_codes
        );

        if num_literal_codes > MAX_LITERAL_CODES || num_distance_codes > MAX_DISTANCE_CODES {
            return Err(Error::InvalidCodeLengths(format!(
                "{num_literal_codes} literal/length or {num_distance_codes} distance codes"
            )));
        }

        let code_length_tree = self.read_code_length_tree(num_code_length_codes)?;
        let lengths =
            self.read_lengths(num_literal_codes + num_distance_codes, &code_length_tree)?;

        if lengths[END_OF_BLOCK as usize] == 0 {
            return Err(Error::MissingEndOfBlock);
        }

        let (literal_lengths, distance_lengths) = lengths.split_at(num_literal_codes);
        let literal_tree = HuffmanTree::from_lengths(literal_lengths)?;
        let distance_tree = HuffmanTree::from_lengths(distance_lengths)?;

        self.inflate_block(&literal_tree, &distance_tree)
    }

    /// Read the 3-bit lengths of the code-length alphabet, stored in
    /// [`CODE_LENGTH_ORDER`] rather than symbol order.
    fn read_code_length_tree(&mut self, count: usize) -> Result<HuffmanTree> {
        self.reader.ensure_bits(3 * count)?;

        let mut lengths = [0u8; 19];
        for &symbol in &CODE_LENGTH_ORDER[..count] {
            lengths[symbol] = self.reader.get_bits(3) as u8;
        }
        HuffmanTree::from_lengths(&lengths)
    }

    /// Decode `count` literal/length + distance code lengths.
    fn read_lengths(&mut self, count: usize, code_length_tree: &HuffmanTree) -> Result<Vec<u8>> {
        let mut lengths = Vec::with_capacity(count);

        while lengths.len() < count {
            self.reader.ensure_bits(MAX_CODE_LENGTH_BITS + 7)?;
            let symbol = code_length_tree.get_symbol(&mut self.reader)?;

            let (value, repeat) = match symbol {
                0..=15 => {
                    lengths.push(symbol as u8);
                    continue;
                }
                16 => {
                    let prev = *lengths.last().ok_or_else(|| {
                        Error::InvalidCodeLengths("repeat with no previous length".into())
                    })?;
                    (prev, self.reader.get_bits(2) + 3)
                }
                17 => (0, self.reader.get_bits(3) + 3),
                18 => (0, self.reader.get_bits(7) + 11),
                _ => {
                    return Err(Error::InvalidSymbol {
                        kind: SymbolKind::CodeLength,
                        symbol,
                    })
                }
            };

            if lengths.len() + repeat > count {
                return Err(Error::InvalidCodeLengths(
                    "repeat runs past the end of the table".into(),
                ));
            }
            lengths.resize(lengths.len() + repeat, value);
        }

        Ok(lengths)
    }

    /// Shared symbol loop for fixed and dynamic blocks.
    fn inflate_block(
        &mut self,
        literal_tree: &HuffmanTree,
        distance_tree: &HuffmanTree,
    ) -> Result<()> {
        loop {
            self.reader.ensure_bits(MAX_BITS + MAX_LENGTH_EXTRA)?;
            let symbol = literal_tree.get_symbol(&mut self.reader)?;

            match symbol {
                0..=255 => {
                    self.check_output(1)?;
                    self.output.push(symbol as u8);
                    self.stats.literals += 1;
                }
                END_OF_BLOCK => return Ok(()),
                257..=285 => {
                    let index = (symbol - 257) as usize;
                    let length = LENGTH_BASE[index] as usize
                        + self.reader.get_bits(LENGTH_EXTRA[index] as u32);
                    self.check_output(length)?;

                    self.reader.ensure_bits(MAX_BITS)?;
                    let distance_symbol = distance_tree.get_symbol(&mut self.reader)?;
                    let index = distance_symbol as usize;
                    if index >= DISTANCE_BASE.len() {
                        return Err(Error::InvalidSymbol {
                            kind: SymbolKind::Distance,
                            symbol: distance_symbol,
                        });
                    }

                    self.reader.ensure_bits(MAX_DISTANCE_EXTRA)?;
                    let distance = DISTANCE_BASE[index] as usize
                        + self.reader.get_bits(DISTANCE_EXTRA[index] as u32);
                    if distance > self.output.len() {
                        return Err(Error::DistanceTooFar {
                            distance,
                            available: self.output.len(),
                        });
                    }

                    copy_match(&mut self.output, distance, length);
                    self.stats.matches += 1;
                }
                _ => {
                    return Err(Error::InvalidSymbol {
                        kind: SymbolKind::LiteralLength,
                        symbol,
                    })
                }
            }
        }
    }
}

/// Append `length` bytes copied from `distance` bytes back.
///
/// When `distance < length` the source overlaps bytes appended by this same
/// copy, so it has to go byte by byte.
fn copy_match(output: &mut Vec<u8>, distance: usize, length: usize) {
    let start = output.len() - distance;
    if distance >= length {
        output.extend_from_within(start..start + length);
    } else {
        output.reserve(length);
        for i in start..start + length {
            let byte = output[i];
            output.push(byte);
        }
    }
}
