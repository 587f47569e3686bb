//! Static DEFLATE tables (RFC 1951 section 3.2.5).

/// Maximum code length for DEFLATE Huffman codes.
pub const MAX_BITS: usize = 15;

/// Maximum code length in the code-length alphabet.
pub const MAX_CODE_LENGTH_BITS: usize = 7;

/// Largest number of extra bits on a length code.
pub const MAX_LENGTH_EXTRA: usize = 5;

/// Largest number of extra bits on a distance code.
pub const MAX_DISTANCE_EXTRA: usize = 13;

/// End-of-block symbol in the literal/length alphabet.
pub const END_OF_BLOCK: u16 = 256;

/// Literal/length codes a dynamic block may declare (257-286).
pub const MAX_LITERAL_CODES: usize = 286;

/// Distance codes a dynamic block may declare (1-30).
pub const MAX_DISTANCE_CODES: usize = 30;

/// Length code base values (codes 257-285).
pub const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits for length codes.
pub const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Distance code base values (codes 0-29).
pub const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance codes.
pub const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Wire order of the code-length alphabet lengths in a dynamic block header.
pub const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];
