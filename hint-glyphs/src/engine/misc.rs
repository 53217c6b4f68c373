//! Miscellaneous instructions.
//!
//! Implements 1 instruction.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#miscellaneous-instructions>

use super::{Engine, OpResult};
use crate::graphics::InterpreterVersion;

impl Engine<'_> {
    /// Get information.
    ///
    /// GETINFO[] (0x88)
    ///
    /// Pops: selector: integer
    /// Pushes: result: integer
    ///
    /// Reports the interpreter version and rendering characteristics
    /// requested by the selector bits. Glyphs are never reported as rotated
    /// or stretched.
    pub(super) fn op_getinfo(&mut self) -> OpResult {
        use getinfo::*;
        let selector = self.value_stack.pop()?;
        let version = self.graphics.version;
        let mut result = 0;
        if selector & VERSION_SELECTOR_BIT != 0 {
            result = match version {
                InterpreterVersion::V35 => 35,
                InterpreterVersion::V40 => 40,
            };
        }
        match version {
            InterpreterVersion::V35 => {
                if selector & GRAYSCALE_SELECTOR_BIT != 0 {
                    result |= GRAYSCALE_RESULT_BIT;
                }
            }
            InterpreterVersion::V40 => {
                for (selector_bit, result_bit) in [
                    (SUBPIXEL_HINTING_SELECTOR_BIT, SUBPIXEL_HINTING_RESULT_BIT),
                    (SUBPIXEL_POSITIONED_SELECTOR_BIT, SUBPIXEL_POSITIONED_RESULT_BIT),
                    (SYMMETRICAL_SMOOTHING_SELECTOR_BIT, SYMMETRICAL_SMOOTHING_RESULT_BIT),
                    (GRAYSCALE_CLEARTYPE_SELECTOR_BIT, GRAYSCALE_CLEARTYPE_RESULT_BIT),
                ] {
                    if selector & selector_bit != 0 {
                        result |= result_bit;
                    }
                }
            }
        }
        self.value_stack.push(result)
    }
}

/// Selector and result bits for `GETINFO`.
mod getinfo {
    pub const VERSION_SELECTOR_BIT: i32 = 1 << 0;

    pub const GRAYSCALE_SELECTOR_BIT: i32 = 1 << 5;
    pub const GRAYSCALE_RESULT_BIT: i32 = 1 << 12;

    pub const SUBPIXEL_HINTING_SELECTOR_BIT: i32 = 1 << 6;
    pub const SUBPIXEL_HINTING_RESULT_BIT: i32 = 1 << 13;

    pub const SUBPIXEL_POSITIONED_SELECTOR_BIT: i32 = 1 << 10;
    pub const SUBPIXEL_POSITIONED_RESULT_BIT: i32 = 1 << 17;

    pub const SYMMETRICAL_SMOOTHING_SELECTOR_BIT: i32 = 1 << 11;
    pub const SYMMETRICAL_SMOOTHING_RESULT_BIT: i32 = 1 << 18;

    pub const GRAYSCALE_CLEARTYPE_SELECTOR_BIT: i32 = 1 << 12;
    pub const GRAYSCALE_CLEARTYPE_RESULT_BIT: i32 = 1 << 19;
}
