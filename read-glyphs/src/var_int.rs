//! Variable length integer encodings used by WOFF2.
//!
//! See <https://www.w3.org/TR/WOFF2/#DataTypes>

use crate::{Cursor, ReadError};

const WORD_CODE: u8 = 253;
const ONE_MORE_BYTE_CODE_2: u8 = 254;
const ONE_MORE_BYTE_CODE_1: u8 = 255;
const LOWEST_U_CODE: u16 = 253;

/// Reads a UIntBase128 encoded value.
///
/// Leading zero bytes, values that do not fit in 32 bits and encodings
/// longer than five bytes are all rejected with
/// [`ReadError::InvalidBase128`].
pub fn read_uint_base128(cursor: &mut Cursor) -> Result<u32, ReadError> {
    let mut accum = 0u32;
    for i in 0..5 {
        let byte = cursor.read_u8()?;
        // No leading zeros
        if i == 0 && byte == 0x80 {
            return Err(ReadError::InvalidBase128);
        }
        // If any of the top seven bits are set then we're about to overflow
        if accum & 0xFE00_0000 != 0 {
            return Err(ReadError::InvalidBase128);
        }
        accum = (accum << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok(accum);
        }
    }
    // More than five bytes
    Err(ReadError::InvalidBase128)
}

/// Reads a 255UInt16 encoded value.
pub fn read_255_u16(cursor: &mut Cursor) -> Result<u16, ReadError> {
    let code = cursor.read_u8()?;
    match code {
        WORD_CODE => cursor.read_u16(),
        ONE_MORE_BYTE_CODE_1 => Ok(cursor.read_u8()? as u16 + LOWEST_U_CODE),
        ONE_MORE_BYTE_CODE_2 => Ok(cursor.read_u8()? as u16 + LOWEST_U_CODE * 2),
        _ => Ok(code as u16),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::{encode_255_u16, encode_uint_base128};

    fn decode_base128(bytes: &[u8]) -> Result<u32, ReadError> {
        read_uint_base128(&mut Cursor::new(bytes))
    }

    fn decode_255(bytes: &[u8]) -> Result<u16, ReadError> {
        read_255_u16(&mut Cursor::new(bytes))
    }

    #[test]
    fn base128_values() {
        assert_eq!(decode_base128(&[0x00]), Ok(0));
        assert_eq!(decode_base128(&[0x3F]), Ok(63));
        assert_eq!(decode_base128(&[0x81, 0x00]), Ok(128));
        assert_eq!(decode_base128(&[0x8F, 0xFF, 0xFF, 0xFF, 0x7F]), Ok(u32::MAX));
    }

    #[test]
    fn base128_rejects_leading_zero() {
        assert_eq!(decode_base128(&[0x80, 0x01]), Err(ReadError::InvalidBase128));
    }

    #[test]
    fn base128_rejects_overflow() {
        assert_eq!(
            decode_base128(&[0x90, 0x80, 0x80, 0x80, 0x00]),
            Err(ReadError::InvalidBase128)
        );
    }

    #[test]
    fn base128_rejects_long_sequence() {
        assert_eq!(
            decode_base128(&[0x81, 0x80, 0x80, 0x80, 0x80, 0x00]),
            Err(ReadError::InvalidBase128)
        );
    }

    #[test]
    fn base128_truncated() {
        assert_eq!(decode_base128(&[0x81]), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn base128_round_trip() {
        let samples = [0, 1, 127, 128, 16383, 16384, 0x1F_FFFF, 0x20_0000, 0x0FFF_FFFF]
            .into_iter()
            .chain([0x1000_0000, u32::MAX - 1, u32::MAX]);
        for value in samples {
            let encoded = encode_uint_base128(value);
            assert_ne!(encoded[0], 0x80);
            assert_eq!(decode_base128(&encoded), Ok(value), "{value}");
        }
    }

    #[test]
    fn u16_255_values() {
        assert_eq!(decode_255(&[0]), Ok(0));
        assert_eq!(decode_255(&[252]), Ok(252));
        assert_eq!(decode_255(&[255, 0]), Ok(253));
        assert_eq!(decode_255(&[255, 252]), Ok(505));
        assert_eq!(decode_255(&[254, 0]), Ok(506));
        assert_eq!(decode_255(&[254, 255]), Ok(761));
        assert_eq!(decode_255(&[253, 0x03, 0x20]), Ok(800));
        assert_eq!(decode_255(&[253, 0x00]), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn u16_255_round_trip() {
        for value in 0..=u16::MAX {
            let encoded = encode_255_u16(value);
            let expected_len = match value {
                0..=252 => 1,
                253..=761 => 2,
                _ => 3,
            };
            assert_eq!(encoded.len(), expected_len, "{value}");
            assert_eq!(decode_255(&encoded), Ok(value));
        }
    }

    #[test]
    fn u16_255_top_of_second_byte_range() {
        assert_eq!(encode_255_u16(758), [254, 252]);
        assert_eq!(encode_255_u16(759), [254, 253]);
        assert_eq!(encode_255_u16(761), [254, 255]);
        assert_eq!(encode_255_u16(762), [253, 0x02, 0xFA]);
        for value in [758, 759, 761, 762] {
            assert_eq!(decode_255(&encode_255_u16(value)), Ok(value));
        }
    }
}
