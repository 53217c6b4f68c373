//! The [hmtx (Horizontal Metrics)](https://learn.microsoft.com/en-us/typography/opentype/spec/hmtx) table.

use font_types::{GlyphId, Tag};

use crate::{BeI16, BeU16, FontData, ReadError};

pub const TAG: Tag = Tag::new(b"hmtx");

/// An advance width and left side bearing pair.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct LongMetric {
    pub advance: BeU16,
    pub side_bearing: BeI16,
}

/// Advance widths and left side bearings.
#[derive(Clone, Debug)]
pub struct Hmtx<'a> {
    long_metrics: &'a [LongMetric],
    left_side_bearings: &'a [BeI16],
}

impl<'a> Hmtx<'a> {
    pub fn read(
        data: FontData<'a>,
        number_of_h_metrics: u16,
        num_glyphs: u16,
    ) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let long_metrics = cursor.read_array(number_of_h_metrics as usize)?;
        let num_lsbs = num_glyphs.saturating_sub(number_of_h_metrics) as usize;
        // Fonts in the wild often truncate the trailing bearings
        let num_lsbs = num_lsbs.min(cursor.remaining_len() / 2);
        let left_side_bearings = cursor.read_array(num_lsbs)?;
        Ok(Self {
            long_metrics,
            left_side_bearings,
        })
    }

    /// Returns the advance width for the given glyph.
    ///
    /// Glyphs beyond the long metrics share the final advance.
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let ix = glyph_id.to_u32() as usize;
        self.long_metrics
            .get(ix)
            .or_else(|| self.long_metrics.last())
            .map(|metric| metric.advance.get())
    }

    /// Returns the left side bearing for the given glyph.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let ix = glyph_id.to_u32() as usize;
        if let Some(metric) = self.long_metrics.get(ix) {
            return Some(metric.side_bearing.get());
        }
        self.left_side_bearings
            .get(ix - self.long_metrics.len())
            .map(|lsb| lsb.get())
    }
}
