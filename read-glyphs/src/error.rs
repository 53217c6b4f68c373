//! Errors that can occur while reading font data.

use font_types::{GlyphId, Tag};

/// An error that occurs when reading font data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// A read or seek went past the end of the available data.
    #[error("An offset was out of bounds")]
    OutOfBounds,
    #[error("Invalid format '{0}'")]
    InvalidFormat(i64),
    #[error("Invalid sfnt version 0x{0:08X}")]
    InvalidSfnt(u32),
    #[error("Invalid ttc tag {0}")]
    InvalidTtc(Tag),
    #[error("Invalid collection index {0}")]
    InvalidCollectionIndex(u32),
    #[error("The {0} table is missing")]
    TableIsMissing(Tag),
    #[error("The glyph {} is outside the range of the glyph table", .0.to_u32())]
    GlyphOutOfRange(GlyphId),
    #[error("Invalid UIntBase128 encoding")]
    InvalidBase128,
    #[error("Brotli decompression failed: {0}")]
    Brotli(String),
    #[error("Composite glyph {} exceeded the maximum nesting depth", .0.to_u32())]
    CompositeDepthExceeded(GlyphId),
    #[error("Malformed data: '{0}'")]
    MalformedData(&'static str),
}
