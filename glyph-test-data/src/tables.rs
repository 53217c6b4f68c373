//! builders for the tables of a minimal TrueType font

use font_types::Tag;

use crate::BeBuffer;

const SFNT_VERSION: u32 = 0x00010000;

/// A `head` table with the given units per em and loca format.
pub fn head(units_per_em: u16, index_to_loc_format: i16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32) // version
        .push(0x00010000u32) // fontRevision
        .push(0u32) // checksumAdjustment
        .push(0x5F0F3CF5u32) // magicNumber
        .push(0u16) // flags
        .push(units_per_em)
        .extend([0u32; 4]) // created, modified
        .extend([0i16, 0, units_per_em as i16, units_per_em as i16])
        .push(0u16) // macStyle
        .push(8u16) // lowestRecPPEM
        .push(2i16) // fontDirectionHint
        .push(index_to_loc_format)
        .push(0i16) // glyphDataFormat
        .into()
}

/// A version 1.0 `maxp` table with generous TrueType limits.
pub fn maxp(num_glyphs: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32)
        .push(num_glyphs)
        .extend([
            256u16, // maxPoints
            16,     // maxContours
            512,    // maxCompositePoints
            32,     // maxCompositeContours
            2,      // maxZones
            16,     // maxTwilightPoints
            64,     // maxStorage
            64,     // maxFunctionDefs
            8,      // maxInstructionDefs
            256,    // maxStackElements
            1024,   // maxSizeOfInstructions
            8,      // maxComponentElements
            4,      // maxComponentDepth
        ])
        .into()
}

/// An `hhea` table with the given number of long metrics.
pub fn hhea(number_of_h_metrics: u16) -> Vec<u8> {
    BeBuffer::new()
        .push(0x00010000u32)
        .extend([800i16, -200, 0]) // ascender, descender, lineGap
        .push(1000u16) // advanceWidthMax
        .extend([0i16, 0, 1000]) // minLsb, minRsb, xMaxExtent
        .extend([1i16, 0, 0]) // caret slope rise, run, offset
        .extend([0i16; 4])
        .push(0i16) // metricDataFormat
        .push(number_of_h_metrics)
        .into()
}

/// An `hmtx` table of (advance, left side bearing) pairs.
pub fn hmtx(metrics: &[(u16, i16)]) -> Vec<u8> {
    metrics
        .iter()
        .fold(BeBuffer::new(), |buf, (advance, lsb)| {
            buf.push(*advance).push(*lsb)
        })
        .into()
}

/// Builds an sfnt file from a list of tables.
///
/// Tables are written in the order they were added.
#[derive(Clone, Debug)]
pub struct SfntBuilder {
    version: u32,
    tables: Vec<(Tag, Vec<u8>)>,
}

impl SfntBuilder {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            tables: Vec::new(),
        }
    }

    /// Adds a table, replacing any existing table with the same tag.
    pub fn table(mut self, tag: Tag, data: &[u8]) -> Self {
        match self.tables.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = data.to_vec(),
            None => self.tables.push((tag, data.to_vec())),
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Builds the font as if it started at `base` within a larger file.
    fn build_at(&self, base: usize) -> Vec<u8> {
        let num_tables = self.tables.len() as u16;
        let entry_selector = num_tables.checked_ilog2().unwrap_or_default() as u16;
        let search_range = (1u16 << entry_selector) * 16;
        let mut buf = BeBuffer::new()
            .push(self.version)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push((num_tables * 16).saturating_sub(search_range));
        let mut offset = base + 12 + self.tables.len() * 16;
        for (tag, data) in &self.tables {
            buf = buf
                .push(*tag)
                .push(0u32)
                .push(offset as u32)
                .push(data.len() as u32);
            offset += padded_len(data);
        }
        for (_, data) in &self.tables {
            buf = buf
                .extend_bytes(data)
                .extend_bytes(&[0; 3][..padded_len(data) - data.len()]);
        }
        buf.into()
    }
}

fn padded_len(data: &[u8]) -> usize {
    data.len().next_multiple_of(4)
}

/// A TrueType collection of the given fonts.
///
/// Version 2 headers are written without a digital signature.
pub fn ttc(fonts: &[SfntBuilder], version_2: bool) -> Vec<u8> {
    let header_len = 12 + fonts.len() * 4 + if version_2 { 12 } else { 0 };
    let mut offsets = Vec::with_capacity(fonts.len());
    let mut body = Vec::new();
    for font in fonts {
        offsets.push((header_len + body.len()) as u32);
        body.extend(font.build_at(header_len + body.len()));
    }
    let mut buf = BeBuffer::new()
        .push(Tag::new(b"ttcf"))
        .push(if version_2 { 2u16 } else { 1 })
        .push(0u16)
        .push(fonts.len() as u32)
        .extend(offsets);
    if version_2 {
        buf = buf.extend([0u32; 3]);
    }
    buf.extend_bytes(&body).into()
}

/// A TrueType font containing the given glyph records, with long `loca`
/// offsets, 1000 units per em and an advance of 500 for every glyph.
pub fn glyf_font(glyphs: &[&[u8]]) -> SfntBuilder {
    let mut loca = BeBuffer::new().push(0u32);
    let mut glyf = Vec::new();
    for glyph in glyphs {
        glyf.extend_from_slice(glyph);
        loca = loca.push(glyf.len() as u32);
    }
    let num_glyphs = glyphs.len() as u16;
    let metrics = vec![(500, 0); glyphs.len()];
    SfntBuilder::new(SFNT_VERSION)
        .table(Tag::new(b"head"), &head(1000, 1))
        .table(Tag::new(b"hhea"), &hhea(num_glyphs))
        .table(Tag::new(b"maxp"), &maxp(num_glyphs))
        .table(Tag::new(b"hmtx"), &hmtx(&metrics))
        .table(Tag::new(b"loca"), &loca)
        .table(Tag::new(b"glyf"), &glyf)
}
