//! The [loca (Index to Location)](https://learn.microsoft.com/en-us/typography/opentype/spec/loca) table.

use std::ops::Range;

use font_types::{GlyphId, Tag};

use crate::{BeU16, BeU32, FontData, ReadError};

pub const TAG: Tag = Tag::new(b"loca");

/// The loca table, in either the short or long format.
#[derive(Clone, Debug)]
pub enum Loca<'a> {
    Short(&'a [BeU16]),
    Long(&'a [BeU32]),
}

impl<'a> Loca<'a> {
    /// Reads `num_glyphs + 1` offsets.
    pub fn read(data: FontData<'a>, is_long: bool, num_glyphs: u16) -> Result<Self, ReadError> {
        let count = num_glyphs as usize + 1;
        Ok(if is_long {
            Loca::Long(data.read_array(0, count)?)
        } else {
            Loca::Short(data.read_array(0, count)?)
        })
    }

    /// The number of glyphs addressed by this table.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => data.len().saturating_sub(1),
            Loca::Long(data) => data.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempt to return the offset for a given glyph index.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.get(idx).map(|x| x.get() as u32 * 2),
            Loca::Long(data) => data.get(idx).map(|x| x.get()),
        }
    }

    /// Returns the byte range of a glyph's record in `glyf`.
    pub fn glyph_range(&self, gid: GlyphId) -> Result<Range<usize>, ReadError> {
        let idx = gid.to_u32() as usize;
        let start = self.get_raw(idx).ok_or(ReadError::GlyphOutOfRange(gid))?;
        let end = self.get_raw(idx + 1).ok_or(ReadError::GlyphOutOfRange(gid))?;
        if start > end {
            return Err(ReadError::MalformedData("loca offsets are not ascending"));
        }
        Ok(start as usize..end as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::BeBuffer;

    #[test]
    fn short_offsets_are_doubled() {
        let data = BeBuffer::new().extend([0u16, 5, 5, 20]);
        let loca = Loca::read(FontData::new(&data), false, 3).unwrap();
        assert_eq!(loca.len(), 3);
        assert_eq!(loca.glyph_range(GlyphId::new(0)).unwrap(), 0..10);
        assert_eq!(loca.glyph_range(GlyphId::new(1)).unwrap(), 10..10);
        assert_eq!(loca.glyph_range(GlyphId::new(2)).unwrap(), 10..40);
        assert_eq!(
            loca.glyph_range(GlyphId::new(3)),
            Err(ReadError::GlyphOutOfRange(GlyphId::new(3)))
        );
    }

    #[test]
    fn descending_offsets() {
        let data = BeBuffer::new().extend([0u32, 40, 20]);
        let loca = Loca::read(FontData::new(&data), true, 2).unwrap();
        assert!(loca.glyph_range(GlyphId::new(0)).is_ok());
        assert!(matches!(
            loca.glyph_range(GlyphId::new(1)),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn too_short() {
        let data = BeBuffer::new().extend([0u16, 5]);
        assert!(Loca::read(FontData::new(&data), false, 3).is_err());
    }
}
