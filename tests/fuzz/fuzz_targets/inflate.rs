//! Fuzz target for the decoders.
//!
//! Arbitrary bytes must produce an error or output, never a panic, and the
//! output must respect the size limit.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use zinflate::{decompress_as, Format, InflateOptions};

#[derive(Arbitrary, Debug)]
struct InflateInput {
    /// Which framing to parse the bytes as (mod 3)
    format: u8,
    /// Output limit in KiB (capped at 1 MiB)
    limit_kib: u16,
    /// Skip checksum verification
    lenient: bool,
    data: Vec<u8>,
}

fuzz_target!(|input: InflateInput| {
    let format = match input.format % 3 {
        0 => Format::Gzip,
        1 => Format::Zlib,
        _ => Format::Deflate,
    };
    let limit = (input.limit_kib as usize % 1024 + 1) * 1024;
    let options = if input.lenient {
        InflateOptions::lenient()
    } else {
        InflateOptions::default()
    }
    .with_max_size(limit);

    if let Ok(out) = decompress_as(&input.data, format, &options) {
        assert!(out.len() <= limit, "output exceeds limit");
    }
});
