//! builders for WOFF2 files and transformed `glyf` tables

use font_types::Tag;

use crate::{brotli_stored, encode_255_u16, encode_uint_base128, BeBuffer};

const GLYF: Tag = Tag::new(b"glyf");
const LOCA: Tag = Tag::new(b"loca");
const ARGS_ARE_WORDS_AND_XY_VALUES: u16 = 0x0003;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;

#[derive(Clone, Debug)]
enum Glyph {
    Empty,
    Square {
        bbox: Option<[i16; 4]>,
        instructions: Vec<u8>,
    },
    Composite {
        components: Vec<(u16, i16, i16)>,
        bbox: Option<[i16; 4]>,
        instructions: Option<Vec<u8>>,
    },
}

/// Builds a transformed `glyf` table glyph by glyph.
#[derive(Clone, Debug, Default)]
pub struct TransformedGlyfBuilder {
    glyphs: Vec<Glyph>,
}

impl TransformedGlyfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a glyph with no outline.
    pub fn empty(mut self) -> Self {
        self.glyphs.push(Glyph::Empty);
        self
    }

    /// Adds the points (0, 0), (0, 100), (100, 100) and (100, 0) where
    /// the third point is off-curve.
    pub fn simple_square(mut self, bbox: Option<[i16; 4]>) -> Self {
        self.glyphs.push(Glyph::Square {
            bbox,
            instructions: Vec::new(),
        });
        self
    }

    /// Sets the instructions of the most recent simple glyph.
    pub fn with_instructions(mut self, bytes: &[u8]) -> Self {
        if let Some(Glyph::Square { instructions, .. }) = self.glyphs.last_mut() {
            *instructions = bytes.to_vec();
        }
        self
    }

    /// Adds a composite of `(glyph, dx, dy)` components.
    pub fn composite(
        mut self,
        components: &[(u16, i16, i16)],
        bbox: [i16; 4],
        instructions: Option<&[u8]>,
    ) -> Self {
        self.glyphs.push(Glyph::Composite {
            components: components.to_vec(),
            bbox: Some(bbox),
            instructions: instructions.map(|bytes| bytes.to_vec()),
        });
        self
    }

    /// Adds a composite that is missing its required bounding box.
    pub fn composite_without_bounds(mut self, components: &[(u16, i16, i16)]) -> Self {
        self.glyphs.push(Glyph::Composite {
            components: components.to_vec(),
            bbox: None,
            instructions: None,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut n_contour = BeBuffer::new();
        let mut n_points = Vec::new();
        let mut flags = Vec::new();
        let mut glyph_stream = Vec::new();
        let mut composites = BeBuffer::new();
        let mut bbox_bitmap = vec![0u8; self.glyphs.len().div_ceil(32) * 4];
        let mut bboxes = BeBuffer::new();
        let mut instruction_stream = Vec::new();
        for (ix, glyph) in self.glyphs.iter().enumerate() {
            let (bbox, instructions) = match glyph {
                Glyph::Empty => {
                    n_contour = n_contour.push(0i16);
                    (None, None)
                }
                Glyph::Square { bbox, instructions } => {
                    n_contour = n_contour.push(1i16);
                    n_points.extend(encode_255_u16(4));
                    // dy 0, dy +100, dx +100 off-curve, dy -100
                    flags.extend([1u8, 1, 0x80 | 11, 0]);
                    glyph_stream.extend([0u8, 100, 100, 100]);
                    glyph_stream.extend(encode_255_u16(instructions.len() as u16));
                    (*bbox, Some(instructions.as_slice()))
                }
                Glyph::Composite {
                    components,
                    bbox,
                    instructions,
                } => {
                    n_contour = n_contour.push(-1i16);
                    for (i, (gid, dx, dy)) in components.iter().enumerate() {
                        let mut component_flags = ARGS_ARE_WORDS_AND_XY_VALUES;
                        if i + 1 < components.len() {
                            component_flags |= MORE_COMPONENTS;
                        } else if instructions.is_some() {
                            component_flags |= WE_HAVE_INSTRUCTIONS;
                        }
                        composites = composites
                            .push(component_flags)
                            .push(*gid)
                            .push(*dx)
                            .push(*dy);
                    }
                    if let Some(instructions) = instructions {
                        glyph_stream.extend(encode_255_u16(instructions.len() as u16));
                    }
                    (*bbox, instructions.as_deref())
                }
            };
            if let Some(bbox) = bbox {
                bbox_bitmap[ix >> 3] |= 0x80 >> (ix & 7);
                bboxes = bboxes.extend(bbox);
            }
            instruction_stream.extend_from_slice(instructions.unwrap_or_default());
        }
        let bbox_stream = [bbox_bitmap.as_slice(), bboxes.as_slice()].concat();
        let streams: [&[u8]; 7] = [
            &n_contour,
            &n_points,
            &flags,
            &glyph_stream,
            &composites,
            &bbox_stream,
            &instruction_stream,
        ];
        let mut buf = BeBuffer::new()
            .push(0u16) // reserved
            .push(0u16) // optionFlags
            .push(self.glyphs.len() as u16)
            .push(0u16); // indexFormat
        for stream in streams {
            buf = buf.push(stream.len() as u32);
        }
        for stream in streams {
            buf = buf.extend_bytes(stream);
        }
        buf.into()
    }
}

#[derive(Clone, Debug)]
struct TableEntry {
    tag: Tag,
    data: Vec<u8>,
    transformed: bool,
}

/// Builds a WOFF2 file with a stored (uncompressed) brotli stream.
#[derive(Clone, Debug, Default)]
pub struct Woff2Builder {
    tables: Vec<TableEntry>,
}

impl Woff2Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an untransformed table.
    pub fn table(mut self, tag: Tag, data: &[u8]) -> Self {
        self.tables.push(TableEntry {
            tag,
            data: data.to_vec(),
            transformed: false,
        });
        self
    }

    /// Adds a transformed `glyf` table and the empty transformed `loca`
    /// that must accompany it.
    pub fn transformed_glyf(mut self, data: &[u8]) -> Self {
        self.tables.push(TableEntry {
            tag: GLYF,
            data: data.to_vec(),
            transformed: true,
        });
        self.tables.push(TableEntry {
            tag: LOCA,
            data: Vec::new(),
            transformed: true,
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut directory = Vec::new();
        let mut stream = Vec::new();
        for table in &self.tables {
            let tag_index = known_tag_index(table.tag);
            let is_glyf_or_loca = table.tag == GLYF || table.tag == LOCA;
            // version 0 transforms glyf and loca; version 3 is the null
            // transform for them, version 0 is the null transform for
            // everything else
            let version = if is_glyf_or_loca && !table.transformed {
                3u8
            } else {
                0
            };
            directory.push((version << 6) | tag_index.unwrap_or(63));
            if tag_index.is_none() {
                directory.extend(table.tag.to_be_bytes());
            }
            directory.extend(encode_uint_base128(table.data.len() as u32));
            if table.transformed {
                directory.extend(encode_uint_base128(table.data.len() as u32));
            }
            stream.extend_from_slice(&table.data);
        }
        let compressed = brotli_stored(&stream);
        let length = 48 + directory.len() + compressed.len();
        let total_sfnt_size = 12 + 16 * self.tables.len() + stream.len();
        BeBuffer::new()
            .push(Tag::new(b"wOF2"))
            .push(0x00010000u32) // flavor
            .push(length as u32)
            .push(self.tables.len() as u16)
            .push(0u16) // reserved
            .push(total_sfnt_size as u32)
            .push(compressed.len() as u32)
            .extend([1u16, 0]) // major, minor version
            .extend([0u32; 5]) // metadata and private blocks
            .extend_bytes(&directory)
            .extend_bytes(&compressed)
            .into()
    }
}

fn known_tag_index(tag: Tag) -> Option<u8> {
    const KNOWN: [&[u8; 4]; 13] = [
        b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ",
        b"fpgm", b"glyf", b"loca", b"prep",
    ];
    KNOWN
        .iter()
        .position(|known| Tag::new(known) == tag)
        .map(|ix| ix as u8)
}
