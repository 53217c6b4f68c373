//! The [hhea (Horizontal Header)](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea) table.

use font_types::Tag;

use crate::{FontData, ReadError};

pub const TAG: Tag = Tag::new(b"hhea");

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hhea {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub number_of_h_metrics: u16,
}

impl Hhea {
    pub fn read(data: FontData) -> Result<Self, ReadError> {
        Ok(Self {
            ascender: data.read_at(4)?,
            descender: data.read_at(6)?,
            line_gap: data.read_at(8)?,
            advance_width_max: data.read_at(10)?,
            number_of_h_metrics: data.read_at(34)?,
        })
    }
}
