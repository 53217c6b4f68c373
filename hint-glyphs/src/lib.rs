//! Hinting TrueType glyph outlines
//!
//! This crate implements the TrueType bytecode interpreter that adjusts the
//! control points of a glyph outline to fit the pixel grid at a particular
//! size. Outlines come from [`read_glyphs`].
//!
//! The interpreter follows the behavior of FreeType's version 40
//! interpreter, including its backward compatibility mode, which ignores
//! horizontal hints in glyph programs. Version 35 behavior is available by
//! turning that mode off in [`HintingOptions`].
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use hint_glyphs::{HintingOptions, PhantomMetrics, TrueTypeInterpreter};
//! use read_glyphs::{FontRef, GlyphId, GlyphTable};
//!
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = FontRef::new(&font_bytes).unwrap();
//! let glyphs = GlyphTable::new(&font).unwrap();
//! let mut interpreter = TrueTypeInterpreter::new(&font, HintingOptions::default()).unwrap();
//! interpreter.set_size(16);
//! let glyph_id = GlyphId::new(1);
//! let mut outline = (*glyphs.get_glyph(glyph_id)).clone();
//! let metrics = PhantomMetrics::new(&font, glyph_id);
//! match interpreter.hint_glyph(glyph_id, &mut outline, metrics) {
//!     Ok(phantom) => println!("hinted advance: {}", phantom[1].x - phantom[0].x),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]

mod call_stack;
pub mod code;
mod cow_slice;
mod definition;
mod engine;
mod error;
mod graphics;
mod instance;
mod math;
mod program;
mod projection;
mod round;
mod value_stack;
mod zone;

pub use error::{HintError, HintErrorKind};
pub use instance::{HintingOptions, PhantomMetrics, TrueTypeInterpreter};
pub use program::Program;
