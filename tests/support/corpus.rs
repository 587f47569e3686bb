//! Deterministic input corpus and reference encoders.
//!
//! Inputs are compressed with flate2 so every stream the decoder sees was
//! produced by an independent DEFLATE implementation.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::{Compression, GzBuilder};
use rand::{rngs::StdRng, Rng, SeedableRng};

const WORDS: &[&str] = &[
    "deflate", "huffman", "window", "literal", "distance", "length", "block", "stored",
    "fixed", "dynamic", "symbol", "trailer", "member", "header", "checksum", "the", "a",
];

/// Pseudo-text built from a small vocabulary; compresses well with long matches.
pub fn text(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(len + 16);
    while out.len() < len {
        let word = WORDS[rng.gen_range(0..WORDS.len())];
        out.extend_from_slice(word.as_bytes());
        out.push(if rng.gen_ratio(1, 12) { b'\n' } else { b' ' });
    }
    out.truncate(len);
    out
}

/// Uniformly random bytes; mostly incompressible.
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = vec![0u8; len];
    rng.fill(out.as_mut_slice());
    out
}

/// Long runs of a few byte values; exercises overlapping copies.
pub fn runs(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        let byte = rng.gen_range(b'a'..=b'd');
        let run = rng.gen_range(1..300);
        out.extend(std::iter::repeat(byte).take(run));
    }
    out.truncate(len);
    out
}

/// Raw DEFLATE followed by four zero bytes of lookahead.
pub fn deflate(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).expect("deflate write");
    let mut out = encoder.finish().expect("deflate finish");
    out.extend_from_slice(&[0, 0, 0, 0]);
    out
}

pub fn zlib(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).expect("zlib write");
    encoder.finish().expect("zlib finish")
}

pub fn gzip(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// gzip member with FNAME and FCOMMENT set.
pub fn gzip_named(data: &[u8], filename: &str, comment: &str) -> Vec<u8> {
    let mut encoder = GzBuilder::new()
        .filename(filename)
        .comment(comment)
        .mtime(1_700_000_000)
        .write(Vec::new(), Compression::default());
    encoder.write_all(data).expect("gzip write");
    encoder.finish().expect("gzip finish")
}
