//! CRC32 checksum (CRC-32/ISO-HDLC), as stored in gzip member trailers.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Slicing-by-8 tables for the reflected polynomial, built at compile time.
static CRC_TABLES: [[u32; 256]; 8] = build_tables();

const fn build_tables() -> [[u32; 256]; 8] {
    let mut tables = [[0u32; 256]; 8];

    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        tables[0][i] = crc;
        i += 1;
    }

    let mut t = 1;
    while t < 8 {
        let mut i = 0;
        while i < 256 {
            let prev = tables[t - 1][i];
            tables[t][i] = (prev >> 8) ^ tables[0][(prev & 0xFF) as usize];
            i += 1;
        }
        t += 1;
    }

    tables
}

/// Calculate the CRC32 checksum of `data`.
#[inline]
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    crc32_update(0, data)
}

/// Continue a CRC32 computed over earlier data with `data`.
///
/// `crc32_update(crc32(a), b) == crc32(a ++ b)`.
#[must_use]
pub fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    let tables = &CRC_TABLES;
    let mut crc = !crc;

    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let low = crc ^ u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let high = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);

        crc = tables[7][(low & 0xFF) as usize]
            ^ tables[6][((low >> 8) & 0xFF) as usize]
            ^ tables[5][((low >> 16) & 0xFF) as usize]
            ^ tables[4][(low >> 24) as usize]
            ^ tables[3][(high & 0xFF) as usize]
            ^ tables[2][((high >> 8) & 0xFF) as usize]
            ^ tables[1][((high >> 16) & 0xFF) as usize]
            ^ tables[0][(high >> 24) as usize];
    }

    for &b in chunks.remainder() {
        crc = (crc >> 8) ^ tables[0][((crc ^ b as u32) & 0xFF) as usize];
    }

    !crc
}
