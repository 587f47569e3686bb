//! Fuzz target comparing against flate2.
//!
//! Whatever flate2 compresses, zinflate must decode back to the same bytes.

#![no_main]

use std::io::Write;

use arbitrary::Arbitrary;
use flate2::write::GzEncoder;
use flate2::Compression;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct RoundtripInput {
    /// Compression level (0-9)
    level: u8,
    data: Vec<u8>,
}

fuzz_target!(|input: RoundtripInput| {
    if input.data.len() > 1024 * 1024 {
        return;
    }

    let level = u32::from(input.level % 10);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(&input.data).unwrap();
    let gz = encoder.finish().unwrap();

    let out = zinflate::gzip_decompress(&gz, input.data.len()).expect("decode flate2 output");
    assert_eq!(out, input.data);
});
