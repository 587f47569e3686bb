//! Raw DEFLATE decoding.
//!
//! - [`bit_reader`]: LSB-first bit cursor over a byte slice
//! - [`huffman`]: canonical Huffman trees
//! - [`tables`]: length/distance base and extra-bit tables
//! - [`inflate`]: block decoder and driver

pub mod bit_reader;
pub mod huffman;
pub mod inflate;
pub mod tables;

pub use inflate::{inflate, inflate_with_options, BlockType, InflateOutput, InflateStats};
