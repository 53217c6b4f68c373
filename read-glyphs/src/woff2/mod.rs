//! The WOFF2 container format.
//!
//! See <https://www.w3.org/TR/WOFF2/>

mod brotli;
pub mod glyf;
pub mod triplet;

use font_types::Tag;

use crate::{
    glyph_table::GlyphTable,
    tables::{glyf::TAG as GLYF, loca::TAG as LOCA},
    var_int::read_uint_base128,
    Cursor, ReadError, TableProvider,
};

/// The WOFF2 signature, `wOF2`.
pub const SIGNATURE: Tag = Tag::new(b"wOF2");

const TTC_FLAVOR: Tag = Tag::new(b"ttcf");
const CUSTOM_TAG_INDEX: u8 = 63;
const NULL_TRANSFORM: u8 = 3;

/// Upper bound on the decompressed table data, matching the limit of the
/// reference WOFF2 decoder.
pub const MAX_DECOMPRESSED_SIZE: usize = 30 * 1024 * 1024;

/// Tags addressable by index in the table directory flags byte.
#[rustfmt::skip]
pub static KNOWN_TAGS: [Tag; 63] = [
    Tag::new(b"cmap"), Tag::new(b"head"), Tag::new(b"hhea"), Tag::new(b"hmtx"),
    Tag::new(b"maxp"), Tag::new(b"name"), Tag::new(b"OS/2"), Tag::new(b"post"),
    Tag::new(b"cvt "), Tag::new(b"fpgm"), Tag::new(b"glyf"), Tag::new(b"loca"),
    Tag::new(b"prep"), Tag::new(b"CFF "), Tag::new(b"VORG"), Tag::new(b"EBDT"),
    Tag::new(b"EBLC"), Tag::new(b"gasp"), Tag::new(b"hdmx"), Tag::new(b"kern"),
    Tag::new(b"LTSH"), Tag::new(b"PCLT"), Tag::new(b"VDMX"), Tag::new(b"vhea"),
    Tag::new(b"vmtx"), Tag::new(b"BASE"), Tag::new(b"GDEF"), Tag::new(b"GPOS"),
    Tag::new(b"GSUB"), Tag::new(b"EBSC"), Tag::new(b"JSTF"), Tag::new(b"MATH"),
    Tag::new(b"CBDT"), Tag::new(b"CBLC"), Tag::new(b"COLR"), Tag::new(b"CPAL"),
    Tag::new(b"SVG "), Tag::new(b"sbix"), Tag::new(b"acnt"), Tag::new(b"avar"),
    Tag::new(b"bdat"), Tag::new(b"bloc"), Tag::new(b"bsln"), Tag::new(b"cvar"),
    Tag::new(b"fdsc"), Tag::new(b"feat"), Tag::new(b"fmtx"), Tag::new(b"fvar"),
    Tag::new(b"gvar"), Tag::new(b"hsty"), Tag::new(b"just"), Tag::new(b"lcar"),
    Tag::new(b"mort"), Tag::new(b"morx"), Tag::new(b"opbd"), Tag::new(b"prop"),
    Tag::new(b"trak"), Tag::new(b"Zapf"), Tag::new(b"Silf"), Tag::new(b"Glat"),
    Tag::new(b"Gloc"), Tag::new(b"Feat"), Tag::new(b"Sill"),
];

/// The fixed size WOFF2 header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Woff2Header {
    pub flavor: Tag,
    pub length: u32,
    pub num_tables: u16,
    pub total_sfnt_size: u32,
    pub total_compressed_size: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub meta_offset: u32,
    pub meta_length: u32,
    pub meta_orig_length: u32,
    pub priv_offset: u32,
    pub priv_length: u32,
}

impl Woff2Header {
    pub fn read(cursor: &mut Cursor) -> Result<Self, ReadError> {
        let signature = cursor.read::<Tag>()?;
        if signature != SIGNATURE {
            return Err(ReadError::InvalidSfnt(u32::from_be_bytes(
                signature.to_be_bytes(),
            )));
        }
        let flavor = cursor.read()?;
        let length = cursor.read_u32()?;
        let num_tables = cursor.read_u16()?;
        if cursor.read_u16()? != 0 {
            return Err(ReadError::MalformedData("nonzero reserved field in WOFF2 header"));
        }
        Ok(Self {
            flavor,
            length,
            num_tables,
            total_sfnt_size: cursor.read_u32()?,
            total_compressed_size: cursor.read_u32()?,
            major_version: cursor.read_u16()?,
            minor_version: cursor.read_u16()?,
            meta_offset: cursor.read_u32()?,
            meta_length: cursor.read_u32()?,
            meta_orig_length: cursor.read_u32()?,
            priv_offset: cursor.read_u32()?,
            priv_length: cursor.read_u32()?,
        })
    }
}

/// An entry in the WOFF2 table directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Woff2TableEntry {
    pub tag: Tag,
    pub transform_version: u8,
    pub orig_length: u32,
    pub transform_length: Option<u32>,
    /// Offset of the table within the decompressed stream.
    pub offset: usize,
}

impl Woff2TableEntry {
    /// `true` if the stored data is not the original table data.
    pub fn is_transformed(&self) -> bool {
        self.transform_length.is_some()
    }

    /// The number of bytes the table occupies in the decompressed stream.
    pub fn stored_length(&self) -> u32 {
        self.transform_length.unwrap_or(self.orig_length)
    }

    fn read(cursor: &mut Cursor, offset: usize) -> Result<Self, ReadError> {
        let flags = cursor.read_u8()?;
        let tag_index = flags & 0x3F;
        let tag = if tag_index == CUSTOM_TAG_INDEX {
            cursor.read::<Tag>()?
        } else {
            KNOWN_TAGS[tag_index as usize]
        };
        let transform_version = (flags >> 6) & 0x03;
        let orig_length = read_uint_base128(cursor)?;
        // glyf and loca use version 3 for the null transform, everything
        // else uses version 0
        let has_transform = if tag == GLYF || tag == LOCA {
            transform_version != NULL_TRANSFORM
        } else {
            transform_version != 0
        };
        let transform_length = if has_transform {
            Some(read_uint_base128(cursor)?)
        } else {
            None
        };
        if tag == LOCA && has_transform && transform_length != Some(0) {
            return Err(ReadError::MalformedData("transformed loca must be empty"));
        }
        Ok(Self {
            tag,
            transform_version,
            orig_length,
            transform_length,
            offset,
        })
    }
}

/// A parsed WOFF2 font with its table data decompressed.
#[derive(Clone)]
pub struct Woff2 {
    header: Woff2Header,
    tables: Vec<Woff2TableEntry>,
    data: Vec<u8>,
}

impl Woff2 {
    /// Parses the header and directory and decompresses the table data.
    pub fn new(data: &[u8]) -> Result<Self, ReadError> {
        let mut cursor = Cursor::new(data);
        let header = Woff2Header::read(&mut cursor)?;
        if header.flavor == TTC_FLAVOR {
            return Err(ReadError::MalformedData("WOFF2 collections are not supported"));
        }
        if header.length as usize != data.len() {
            return Err(ReadError::MalformedData("WOFF2 length does not match data"));
        }
        let mut tables = Vec::with_capacity(header.num_tables as usize);
        let mut offset = 0usize;
        for _ in 0..header.num_tables {
            let entry = Woff2TableEntry::read(&mut cursor, offset)?;
            offset = offset
                .checked_add(entry.stored_length() as usize)
                .filter(|total| *total <= MAX_DECOMPRESSED_SIZE)
                .ok_or(ReadError::MalformedData(
                    "WOFF2 table data exceeds the decompressed size limit",
                ))?;
            tables.push(entry);
        }
        let compressed = cursor.read_bytes(header.total_compressed_size as usize)?;
        let data = brotli::decompress(compressed, offset)?;
        log::debug!(
            "decoded WOFF2 with {} tables ({} bytes)",
            tables.len(),
            data.len()
        );
        Ok(Self {
            header,
            tables,
            data,
        })
    }

    pub fn header(&self) -> &Woff2Header {
        &self.header
    }

    pub fn table_directory(&self) -> &[Woff2TableEntry] {
        &self.tables
    }

    fn entry(&self, tag: Tag) -> Option<&Woff2TableEntry> {
        self.tables.iter().find(|entry| entry.tag == tag)
    }

    fn stored_data(&self, entry: &Woff2TableEntry) -> Option<&[u8]> {
        self.data
            .get(entry.offset..entry.offset + entry.stored_length() as usize)
    }

    /// Builds the glyph table.
    ///
    /// A transformed `glyf` table is decoded in a single batch; an
    /// untransformed one is read lazily through `loca`.
    pub fn glyph_table(&self) -> Result<GlyphTable<'_>, ReadError> {
        let entry = self.entry(GLYF).ok_or(ReadError::TableIsMissing(GLYF))?;
        if entry.is_transformed() {
            let data = self.stored_data(entry).ok_or(ReadError::OutOfBounds)?;
            let glyphs = glyf::decode_transformed_glyf(data)?;
            Ok(GlyphTable::from_decoded(glyphs))
        } else {
            GlyphTable::new(self)
        }
    }
}

impl TableProvider for Woff2 {
    /// Returns the data for untransformed tables.
    fn table_data(&self, tag: Tag) -> Option<&[u8]> {
        let entry = self.entry(tag)?;
        if entry.is_transformed() {
            return None;
        }
        self.stored_data(entry)
    }
}
