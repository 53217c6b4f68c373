//! Reading TrueType glyph outlines
//!
//! This crate provides memory safe parsing of the glyph data in TrueType
//! fonts, whether stored in a plain sfnt file, a TrueType collection or a
//! WOFF2 file. Glyphs are decoded on demand into flat outlines of
//! [control points](ControlPoint), with composite glyphs resolved into
//! their components.
//!
//! For hinting those outlines, see the `hint-glyphs` crate.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use read_glyphs::{FontRef, GlyphId, GlyphTable, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! // Single fonts only. for font collections (.ttc) use FontRef::from_index
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let glyphs = GlyphTable::new(&font).expect("missing glyf or loca");
//! let outline = glyphs.get_glyph(GlyphId::new(1));
//!
//! println!(
//!     "{} units per em, glyph 1 has {} contours",
//!     font.head().unwrap().units_per_em,
//!     outline.num_contours()
//! );
//! ```
//!
//! # Related projects
//!
//! - [`read-fonts`] provides zero-copy access to every OpenType table
//!
//! [`read-fonts`]: https://docs.rs/read-fonts/

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]

pub mod composite;
mod error;
pub mod flags;
mod font_data;
pub mod glyf;
mod glyph;
mod glyph_table;
pub mod sfnt;
mod table_provider;
pub mod tables;
pub mod var_int;
pub mod woff2;

/// Public re-export of the font-types crate.
pub extern crate font_types as types;

pub use error::ReadError;
pub use font_data::{BeI16, BeU16, BeU32, Cursor, FontData, ReadScalar};
pub use font_types::{GlyphId, Tag};
pub use glyph::{Bounds, ControlPoint, GlyphVector, Transform};
pub use glyph_table::{GlyphLoader, GlyphTable};
pub use sfnt::{CollectionRef, FontRef};
pub use table_provider::TableProvider;
pub use woff2::Woff2;

/// The maximum nesting depth of composite glyphs.
///
/// Deeper chains, including reference cycles, fail to resolve.
pub const MAX_COMPOSITE_DEPTH: usize = 16;
