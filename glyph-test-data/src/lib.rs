//! test data shared between the glyph reading and hinting crates.

pub mod bebuffer;
pub mod glyf;
pub mod tables;
pub mod woff2;

pub use bebuffer::{BeBuffer, BeScalar};

const MAX_STORED_BLOCK: usize = 1 << 16;

/// Wraps `data` in a brotli stream made only of uncompressed meta-blocks.
///
/// Useful for building WOFF2 fixtures without a brotli encoder.
pub fn brotli_stored(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        // WBITS = 16, ISLAST, ISLASTEMPTY
        return vec![0x06];
    }
    let mut out = Vec::with_capacity(data.len() + 8);
    for (ix, chunk) in data.chunks(MAX_STORED_BLOCK).enumerate() {
        let mlen = chunk.len() as u32 - 1;
        // ISLAST = 0, MNIBBLES = 4, MLEN - 1, ISUNCOMPRESSED = 1; the first
        // header is preceded by a single zero bit selecting WBITS = 16
        let header = if ix == 0 {
            (mlen << 4) | (1 << 20)
        } else {
            (mlen << 3) | (1 << 19)
        };
        out.extend_from_slice(&header.to_le_bytes()[..3]);
        out.extend_from_slice(chunk);
    }
    // an empty final meta-block
    out.push(0x03);
    out
}

/// Encodes a value in the shortest 255UInt16 form.
pub fn encode_255_u16(value: u16) -> Vec<u8> {
    const ONE_MORE_BYTE_CODE1: u8 = 255;
    const ONE_MORE_BYTE_CODE2: u8 = 254;
    const WORD_CODE: u8 = 253;
    const LOWEST_U_CODE: u16 = 253;
    match value {
        0..=252 => vec![value as u8],
        253..=505 => vec![ONE_MORE_BYTE_CODE1, (value - LOWEST_U_CODE) as u8],
        506..=761 => vec![ONE_MORE_BYTE_CODE2, (value - LOWEST_U_CODE * 2) as u8],
        _ => {
            let [hi, lo] = value.to_be_bytes();
            vec![WORD_CODE, hi, lo]
        }
    }
}

/// Encodes a value in the canonical UIntBase128 form.
pub fn encode_uint_base128(value: u32) -> Vec<u8> {
    let mut out = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest != 0 {
        out.insert(0, 0x80 | (rest & 0x7F) as u8);
        rest >>= 7;
    }
    out
}
