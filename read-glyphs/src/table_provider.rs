//! a trait for things that can serve font tables

use font_types::Tag;

use crate::{
    tables::{self, head::Head, hhea::Hhea, hmtx::Hmtx, loca::Loca, maxp::Maxp},
    BeI16, FontData, ReadError,
};

/// An interface for accessing tables from a font (or font-like object)
pub trait TableProvider {
    /// Returns the raw data of the table with the given tag, if present.
    fn table_data(&self, tag: Tag) -> Option<&[u8]>;

    fn expect_table_data(&self, tag: Tag) -> Result<FontData<'_>, ReadError> {
        self.table_data(tag)
            .map(FontData::new)
            .ok_or(ReadError::TableIsMissing(tag))
    }

    fn head(&self) -> Result<Head, ReadError> {
        self.expect_table_data(tables::head::TAG).and_then(Head::read)
    }

    fn maxp(&self) -> Result<Maxp, ReadError> {
        self.expect_table_data(tables::maxp::TAG).and_then(Maxp::read)
    }

    fn hhea(&self) -> Result<Hhea, ReadError> {
        self.expect_table_data(tables::hhea::TAG).and_then(Hhea::read)
    }

    fn hmtx(&self) -> Result<Hmtx<'_>, ReadError> {
        let num_glyphs = self.maxp()?.num_glyphs;
        let number_of_h_metrics = self.hhea()?.number_of_h_metrics;
        self.expect_table_data(tables::hmtx::TAG)
            .and_then(|data| Hmtx::read(data, number_of_h_metrics, num_glyphs))
    }

    fn loca(&self) -> Result<Loca<'_>, ReadError> {
        let is_long = self.head()?.is_long_loca();
        let num_glyphs = self.maxp()?.num_glyphs;
        self.expect_table_data(tables::loca::TAG)
            .and_then(|data| Loca::read(data, is_long, num_glyphs))
    }

    /// Returns the control value table, or an empty slice if the font has
    /// none.
    fn cvt(&self) -> Result<&[BeI16], ReadError> {
        match self.table_data(tables::cvt::TAG) {
            Some(data) => FontData::new(data).read_array(0, data.len() / 2),
            None => Ok(&[]),
        }
    }

    /// Returns the font program, or an empty slice if the font has none.
    fn fpgm(&self) -> &[u8] {
        self.table_data(tables::fpgm::TAG).unwrap_or_default()
    }

    /// Returns the control value program, or an empty slice if the font
    /// has none.
    fn prep(&self) -> &[u8] {
        self.table_data(tables::prep::TAG).unwrap_or_default()
    }
}

impl<T: TableProvider + ?Sized> TableProvider for &T {
    fn table_data(&self, tag: Tag) -> Option<&[u8]> {
        (**self).table_data(tag)
    }
}
