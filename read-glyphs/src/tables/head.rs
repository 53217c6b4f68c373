//! The [head (Font Header)](https://learn.microsoft.com/en-us/typography/opentype/spec/head) table.

use font_types::Tag;

use crate::{FontData, ReadError};

pub const TAG: Tag = Tag::new(b"head");

const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The fields of `head` used for glyph loading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Head {
    pub units_per_em: u16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    /// 0 for short offsets, 1 for long.
    pub index_to_loc_format: i16,
}

impl Head {
    pub fn read(data: FontData) -> Result<Self, ReadError> {
        if data.read_at::<u32>(12)? != MAGIC_NUMBER {
            return Err(ReadError::MalformedData("bad head magic number"));
        }
        Ok(Self {
            units_per_em: data.read_at(18)?,
            x_min: data.read_at(36)?,
            y_min: data.read_at(38)?,
            x_max: data.read_at(40)?,
            y_max: data.read_at(42)?,
            index_to_loc_format: data.read_at(50)?,
        })
    }

    /// `true` if `loca` uses 32-bit offsets.
    pub fn is_long_loca(&self) -> bool {
        self.index_to_loc_format == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_head() {
        let data = glyph_test_data::tables::head(2048, 1);
        let head = Head::read(FontData::new(&data)).unwrap();
        assert_eq!(head.units_per_em, 2048);
        assert!(head.is_long_loca());
        assert!(Head::read(FontData::new(&data[..50])).is_err());
    }

    #[test]
    fn bad_magic() {
        let mut data = glyph_test_data::tables::head(1000, 0);
        data[12] = 0;
        assert!(matches!(
            Head::read(FontData::new(&data)),
            Err(ReadError::MalformedData(_))
        ));
    }
}
