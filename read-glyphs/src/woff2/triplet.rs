//! The triplet encoding used for points in the transformed `glyf` table.
//!
//! See <https://www.w3.org/TR/WOFF2/#triplet_decoding>

use crate::{Cursor, ReadError};

/// One entry of the triplet lookup table.
///
/// `byte_count` includes the flag byte itself.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TripleEncodingRecord {
    pub byte_count: u8,
    pub x_bits: u8,
    pub y_bits: u8,
    pub delta_x: u16,
    pub delta_y: u16,
    pub x_sign: i8,
    pub y_sign: i8,
}

impl TripleEncodingRecord {
    /// Reconstructs the signed `(dx, dy)` pair from the packed data bytes
    /// following the flag byte.
    pub fn decode(&self, data: &[u8]) -> (i32, i32) {
        let packed = data
            .iter()
            .fold(0u32, |acc, byte| (acc << 8) | *byte as u32);
        let total_bits = data.len() as u32 * 8;
        let x_bits = self.x_bits as u32;
        let y_bits = self.y_bits as u32;
        let x = (packed >> (total_bits - x_bits)) & mask(x_bits);
        let y = (packed >> (total_bits - x_bits - y_bits)) & mask(y_bits);
        (
            Self::tx(x, self.delta_x, self.x_sign),
            Self::tx(y, self.delta_y, self.y_sign),
        )
    }

    fn tx(orig: u32, delta: u16, sign: i8) -> i32 {
        (orig as i32 + delta as i32) * sign as i32
    }
}

const fn mask(bits: u32) -> u32 {
    if bits == 0 {
        0
    } else {
        u32::MAX >> (32 - bits)
    }
}

/// The 128 entry lookup table, indexed by the low seven bits of a flag.
pub static TRIPLET_TABLE: [TripleEncodingRecord; 128] = build_table();

// Sign pairs in table order for entries that carry both coordinates.
const SIGNS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

const fn record(
    byte_count: u8,
    x_bits: u8,
    y_bits: u8,
    delta_x: u16,
    delta_y: u16,
    x_sign: i8,
    y_sign: i8,
) -> TripleEncodingRecord {
    TripleEncodingRecord {
        byte_count,
        x_bits,
        y_bits,
        delta_x,
        delta_y,
        x_sign,
        y_sign,
    }
}

const fn build_table() -> [TripleEncodingRecord; 128] {
    let mut table = [record(0, 0, 0, 0, 0, 0, 0); 128];
    let mut ix = 0;
    // 0..10: y only, 8 bits, deltas in steps of 256
    let mut step = 0;
    while step < 5 {
        table[ix] = record(2, 0, 8, 0, step * 256, 0, -1);
        table[ix + 1] = record(2, 0, 8, 0, step * 256, 0, 1);
        ix += 2;
        step += 1;
    }
    // 10..20: x only, 8 bits, deltas in steps of 256
    step = 0;
    while step < 5 {
        table[ix] = record(2, 8, 0, step * 256, 0, -1, 0);
        table[ix + 1] = record(2, 8, 0, step * 256, 0, 1, 0);
        ix += 2;
        step += 1;
    }
    // 20..84: 4 bits each, deltas 1, 17, 33, 49
    let mut dx = 0;
    while dx < 4 {
        let mut dy = 0;
        while dy < 4 {
            let mut s = 0;
            while s < 4 {
                table[ix] = record(2, 4, 4, 1 + dx * 16, 1 + dy * 16, SIGNS[s].0, SIGNS[s].1);
                ix += 1;
                s += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    // 84..120: 8 bits each, deltas 1, 257, 513
    dx = 0;
    while dx < 3 {
        let mut dy = 0;
        while dy < 3 {
            let mut s = 0;
            while s < 4 {
                table[ix] = record(3, 8, 8, 1 + dx * 256, 1 + dy * 256, SIGNS[s].0, SIGNS[s].1);
                ix += 1;
                s += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    // 120..124: 12 bits each
    let mut s = 0;
    while s < 4 {
        table[ix] = record(4, 12, 12, 0, 0, SIGNS[s].0, SIGNS[s].1);
        ix += 1;
        s += 1;
    }
    // 124..128: 16 bits each
    s = 0;
    while s < 4 {
        table[ix] = record(5, 16, 16, 0, 0, SIGNS[s].0, SIGNS[s].1);
        ix += 1;
        s += 1;
    }
    table
}

/// Decodes one point delta for `flag`, reading its data bytes from `cursor`.
///
/// Returns `(dx, dy, on_curve)`.
pub fn read_triplet(flag: u8, cursor: &mut Cursor) -> Result<(i32, i32, bool), ReadError> {
    let record = &TRIPLET_TABLE[(flag & 0x7F) as usize];
    let data = cursor.read_bytes(record.byte_count as usize - 1)?;
    let (dx, dy) = record.decode(data);
    Ok((dx, dy, flag & 0x80 == 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_entries() {
        assert_eq!(TRIPLET_TABLE[0], record(2, 0, 8, 0, 0, 0, -1));
        assert_eq!(TRIPLET_TABLE[9], record(2, 0, 8, 0, 1024, 0, 1));
        assert_eq!(TRIPLET_TABLE[10], record(2, 8, 0, 0, 0, -1, 0));
        assert_eq!(TRIPLET_TABLE[19], record(2, 8, 0, 1024, 0, 1, 0));
        assert_eq!(TRIPLET_TABLE[20], record(2, 4, 4, 1, 1, -1, -1));
        assert_eq!(TRIPLET_TABLE[37], record(2, 4, 4, 17, 1, 1, -1));
        assert_eq!(TRIPLET_TABLE[83], record(2, 4, 4, 49, 49, 1, 1));
        assert_eq!(TRIPLET_TABLE[84], record(3, 8, 8, 1, 1, -1, -1));
        assert_eq!(TRIPLET_TABLE[119], record(3, 8, 8, 513, 513, 1, 1));
        assert_eq!(TRIPLET_TABLE[120], record(4, 12, 12, 0, 0, -1, -1));
        assert_eq!(TRIPLET_TABLE[127], record(5, 16, 16, 0, 0, 1, 1));
    }

    #[test]
    fn byte_counts_by_range() {
        for (ix, entry) in TRIPLET_TABLE.iter().enumerate() {
            let expected = match ix {
                0..=83 => 2,
                84..=119 => 3,
                120..=123 => 4,
                _ => 5,
            };
            assert_eq!(entry.byte_count, expected, "entry {ix}");
            assert_eq!(
                (entry.x_bits as u32 + entry.y_bits as u32) % 4,
                0,
                "entry {ix}"
            );
        }
    }

    #[test]
    fn decode_each_width() {
        // y only: 0x10 with delta 256, negative
        assert_eq!(TRIPLET_TABLE[2].decode(&[0x10]), (0, -272));
        // x only positive
        assert_eq!(TRIPLET_TABLE[11].decode(&[0x7F]), (127, 0));
        // nibbles: x = 0x3 + 1 negated, y = 0xA + 1 negated
        assert_eq!(TRIPLET_TABLE[20].decode(&[0x3A]), (-4, -11));
        // bytes: x = 2 + 257, y = 3 + 1
        assert_eq!(TRIPLET_TABLE[99].decode(&[0x02, 0x03]), (259, 4));
        // 12 bits each
        assert_eq!(TRIPLET_TABLE[123].decode(&[0x12, 0x34, 0x56]), (0x123, 0x456));
        // 16 bits each, x negative
        assert_eq!(
            TRIPLET_TABLE[126].decode(&[0x01, 0x00, 0x02, 0x00]),
            (-256, 512)
        );
    }

    #[test]
    fn read_flag_and_data() {
        let data = [0x12, 0x34, 0x56, 0xFF];
        let mut cursor = Cursor::new(&data);
        assert_eq!(read_triplet(123, &mut cursor).unwrap(), (0x123, 0x456, true));
        assert_eq!(read_triplet(0x80 | 1, &mut cursor).unwrap(), (0, 255, false));
        assert!(read_triplet(0, &mut cursor).is_err());
    }
}
