//! Fonts and collections in the sfnt container format.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/otff>

use font_types::Tag;

use crate::{BeU32, FontData, ReadError, TableProvider};

/// 'true' - the sfnt version used by old Apple TrueType fonts.
pub const TRUE_SFNT_VERSION: u32 = 0x74727565;
/// The sfnt version for fonts with TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// 'OTTO' - the sfnt version for fonts with CFF outlines.
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;

pub const TTC_HEADER_TAG: Tag = Tag::new(b"ttcf");

const TABLE_DIRECTORY_HEADER_LEN: usize = 12;

/// A record in the table directory.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct TableRecord {
    tag: [u8; 4],
    pub checksum: BeU32,
    pub offset: BeU32,
    pub length: BeU32,
}

impl TableRecord {
    pub fn tag(&self) -> Tag {
        Tag::from_be_bytes(self.tag)
    }
}

/// The table directory at the start of a font.
#[derive(Clone, Debug)]
pub struct TableDirectory<'a> {
    pub sfnt_version: u32,
    pub table_records: &'a [TableRecord],
}

impl<'a> TableDirectory<'a> {
    pub fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version = cursor.read_u32()?;
        let num_tables = cursor.read_u16()?;
        // searchRange, entrySelector and rangeShift
        cursor.advance_by(6)?;
        debug_assert_eq!(cursor.position(), TABLE_DIRECTORY_HEADER_LEN);
        let table_records = cursor.read_array(num_tables as usize)?;
        Ok(Self {
            sfnt_version,
            table_records,
        })
    }

    fn is_sorted(&self) -> bool {
        self.table_records
            .windows(2)
            .all(|pair| pair[0].tag() < pair[1].tag())
    }
}

/// Reference to the content of a font collection file.
#[derive(Clone, Debug)]
pub struct CollectionRef<'a> {
    data: FontData<'a>,
    major_version: u16,
    table_directory_offsets: &'a [BeU32],
    dsig: Option<(u32, u32)>,
}

impl<'a> CollectionRef<'a> {
    /// Creates a new reference to a font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let mut cursor = data.cursor();
        let tag = cursor.read::<Tag>()?;
        if tag != TTC_HEADER_TAG {
            return Err(ReadError::InvalidTtc(tag));
        }
        let major_version = cursor.read_u16()?;
        let _minor_version = cursor.read_u16()?;
        let num_fonts = cursor.read_u32()?;
        let table_directory_offsets = cursor.read_array(num_fonts as usize)?;
        let dsig = match major_version {
            1 => None,
            2 => {
                let dsig_tag = cursor.read_u32()?;
                let dsig_length = cursor.read_u32()?;
                let dsig_offset = cursor.read_u32()?;
                (dsig_tag != 0).then_some((dsig_offset, dsig_length))
            }
            _ => return Err(ReadError::InvalidFormat(major_version as i64)),
        };
        Ok(Self {
            data,
            major_version,
            table_directory_offsets,
            dsig,
        })
    }

    /// Returns the number of fonts in the collection.
    pub fn len(&self) -> u32 {
        self.table_directory_offsets.len() as u32
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn major_version(&self) -> u16 {
        self.major_version
    }

    /// The offset and length of the collection's digital signature, for
    /// version 2 headers that carry one.
    pub fn dsig(&self) -> Option<(u32, u32)> {
        self.dsig
    }

    /// Returns the font in the collection at the specified index.
    pub fn get(&self, index: u32) -> Result<FontRef<'a>, ReadError> {
        let offset = self
            .table_directory_offsets
            .get(index as usize)
            .ok_or(ReadError::InvalidCollectionIndex(index))?
            .get() as usize;
        let table_dir_data = self.data.slice(offset..).ok_or(ReadError::OutOfBounds)?;
        FontRef::with_table_directory(
            self.data,
            TableDirectory::read(table_dir_data)?,
            Some(index),
        )
    }

    /// Returns an iterator over the fonts in the collection.
    pub fn iter(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).map(move |ix| copy.get(ix))
    }
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
#[derive(Clone, Debug)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    table_directory: TableDirectory<'a>,
    ttc_index: Option<u32>,
    // Fonts are required to have a sorted directory but some don't, so
    // fall back to a linear scan for those.
    table_directory_sorted: bool,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to a single font (not a collection).
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        Self::with_table_directory(data, TableDirectory::read(data)?, None)
    }

    /// Creates a reference to the font at `index` in either a collection
    /// or a single font file.
    ///
    /// For a single font the index must be 0.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, ReadError> {
        match CollectionRef::new(data) {
            Ok(collection) => collection.get(index),
            Err(_) if index == 0 => Self::new(data),
            Err(_) => Err(ReadError::InvalidCollectionIndex(index)),
        }
    }

    /// Returns the underlying font data.
    ///
    /// For collections this is the entire file.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// If the font is in a collection, returns its index.
    pub fn ttc_index(&self) -> Option<u32> {
        self.ttc_index
    }

    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the data for the table with the specified tag, if present.
    pub fn table(&self, tag: Tag) -> Option<FontData<'a>> {
        let records = self.table_directory.table_records;
        let entry = if self.table_directory_sorted {
            records.binary_search_by(|rec| rec.tag().cmp(&tag)).ok()
        } else {
            records.iter().position(|rec| rec.tag() == tag)
        };
        let record = records.get(entry?)?;
        let start = record.offset.get() as usize;
        if start == 0 {
            return None;
        }
        let end = start.checked_add(record.length.get() as usize)?;
        self.data.slice(start..end)
    }

    fn with_table_directory(
        data: FontData<'a>,
        table_directory: TableDirectory<'a>,
        ttc_index: Option<u32>,
    ) -> Result<Self, ReadError> {
        if ![TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION]
            .contains(&table_directory.sfnt_version)
        {
            return Err(ReadError::InvalidSfnt(table_directory.sfnt_version));
        }
        let table_directory_sorted = table_directory.is_sorted();
        Ok(FontRef {
            data,
            table_directory,
            ttc_index,
            table_directory_sorted,
        })
    }
}

impl TableProvider for FontRef<'_> {
    fn table_data(&self, tag: Tag) -> Option<&[u8]> {
        self.table(tag).map(|data| data.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::tables::{ttc, SfntBuilder};

    const HEAD: Tag = Tag::new(b"head");
    const MAXP: Tag = Tag::new(b"maxp");

    fn font() -> SfntBuilder {
        SfntBuilder::new(TT_SFNT_VERSION)
            .table(HEAD, &glyph_test_data::tables::head(1000, 0))
            .table(MAXP, &glyph_test_data::tables::maxp(7))
    }

    #[test]
    fn table_lookup() {
        let data = font().build();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.ttc_index(), None);
        assert_eq!(font.table_directory().table_records.len(), 2);
        assert_eq!(font.head().unwrap().units_per_em, 1000);
        assert_eq!(font.maxp().unwrap().num_glyphs, 7);
        assert!(font.table_data(Tag::new(b"glyf")).is_none());
        assert_eq!(
            font.loca().unwrap_err(),
            ReadError::TableIsMissing(Tag::new(b"loca"))
        );
        assert!(font.fpgm().is_empty());
        assert!(font.cvt().unwrap().is_empty());
    }

    #[test]
    fn unsorted_table_directory() {
        let data = SfntBuilder::new(TT_SFNT_VERSION)
            .table(MAXP, &glyph_test_data::tables::maxp(3))
            .table(HEAD, &glyph_test_data::tables::head(2048, 1))
            .build();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.head().unwrap().units_per_em, 2048);
        assert_eq!(font.maxp().unwrap().num_glyphs, 3);
    }

    #[test]
    fn bad_version() {
        let data = SfntBuilder::new(0x00020000).build();
        assert_eq!(
            FontRef::new(&data).unwrap_err(),
            ReadError::InvalidSfnt(0x00020000)
        );
        let cff = SfntBuilder::new(CFF_SFNT_VERSION).build();
        assert!(FontRef::new(&cff).is_ok());
    }

    #[test]
    fn table_out_of_bounds() {
        let mut data = font().build();
        data.truncate(data.len() - 4);
        let font = FontRef::new(&data).unwrap();
        assert!(font.table_data(MAXP).is_none());
        assert!(font.table_data(HEAD).is_some());
    }

    #[test]
    fn collection() {
        let other = SfntBuilder::new(TT_SFNT_VERSION)
            .table(MAXP, &glyph_test_data::tables::maxp(42));
        let data = ttc(&[font(), other], false);
        let collection = CollectionRef::new(&data).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.major_version(), 1);
        assert_eq!(collection.dsig(), None);
        let counts = collection
            .iter()
            .map(|font| font.unwrap().maxp().unwrap().num_glyphs)
            .collect::<Vec<_>>();
        assert_eq!(counts, [7, 42]);
        let second = FontRef::from_index(&data, 1).unwrap();
        assert_eq!(second.ttc_index(), Some(1));
        assert_eq!(
            FontRef::from_index(&data, 2).unwrap_err(),
            ReadError::InvalidCollectionIndex(2)
        );
        assert!(FontRef::new(&data).is_err());
    }

    #[test]
    fn collection_version_2() {
        let data = ttc(&[font()], true);
        let collection = CollectionRef::new(&data).unwrap();
        assert_eq!(collection.major_version(), 2);
        assert_eq!(collection.dsig(), None);
        assert!(collection.get(0).is_ok());
    }

    #[test]
    fn single_font_index() {
        let data = font().build();
        assert!(FontRef::from_index(&data, 0).is_ok());
        assert_eq!(
            FontRef::from_index(&data, 1).unwrap_err(),
            ReadError::InvalidCollectionIndex(1)
        );
        assert!(matches!(
            CollectionRef::new(&data),
            Err(ReadError::InvalidTtc(_))
        ));
    }
}
