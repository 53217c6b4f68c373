//! The [maxp (Maximum Profile)](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp) table.

use font_types::Tag;

use crate::{FontData, ReadError};

pub const TAG: Tag = Tag::new(b"maxp");

const VERSION_0_5: u32 = 0x00005000;
const VERSION_1_0: u32 = 0x00010000;

/// The glyph count and, for TrueType outlines, interpreter limits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Maxp {
    pub num_glyphs: u16,
    pub truetype: Option<TrueTypeLimits>,
}

/// Limits from a version 1.0 `maxp` table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrueTypeLimits {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

impl Maxp {
    pub fn read(data: FontData) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read_u32()?;
        let num_glyphs = cursor.read_u16()?;
        let truetype = match version {
            VERSION_0_5 => None,
            VERSION_1_0 => Some(TrueTypeLimits {
                max_points: cursor.read_u16()?,
                max_contours: cursor.read_u16()?,
                max_composite_points: cursor.read_u16()?,
                max_composite_contours: cursor.read_u16()?,
                max_zones: cursor.read_u16()?,
                max_twilight_points: cursor.read_u16()?,
                max_storage: cursor.read_u16()?,
                max_function_defs: cursor.read_u16()?,
                max_instruction_defs: cursor.read_u16()?,
                max_stack_elements: cursor.read_u16()?,
                max_size_of_instructions: cursor.read_u16()?,
                max_component_elements: cursor.read_u16()?,
                max_component_depth: cursor.read_u16()?,
            }),
            _ => return Err(ReadError::InvalidFormat(version as i64)),
        };
        Ok(Self {
            num_glyphs,
            truetype,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::BeBuffer;

    #[test]
    fn versions() {
        let cff = BeBuffer::new().push(VERSION_0_5).push(12u16);
        let maxp = Maxp::read(FontData::new(&cff)).unwrap();
        assert_eq!(maxp.num_glyphs, 12);
        assert!(maxp.truetype.is_none());
        let data = glyph_test_data::tables::maxp(3);
        let maxp = Maxp::read(FontData::new(&data)).unwrap();
        assert_eq!(maxp.num_glyphs, 3);
        assert!(maxp.truetype.unwrap().max_stack_elements > 0);
        let bad = BeBuffer::new().push(2u32).push(1u16);
        assert_eq!(
            Maxp::read(FontData::new(&bad)),
            Err(ReadError::InvalidFormat(2))
        );
    }
}
