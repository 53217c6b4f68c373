//! Hinting error definitions.

use font_types::GlyphId;

use crate::{code::opcode_name, program::Program};

/// Errors that may occur when interpreting TrueType bytecode.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum HintErrorKind {
    #[error("unexpected end of bytecode")]
    UnexpectedEndOfBytecode,
    #[error("unhandled instruction opcode {0:#04X}")]
    UnhandledOpcode(u8),
    #[error("function or instruction definition present in glyph program")]
    DefinitionInGlyphProgram,
    #[error("nested function or instruction definition")]
    NestedDefinition,
    #[error("function or instruction definition exceeded the maximum size of 64k")]
    DefinitionTooLarge,
    #[error("too many function or instruction definitions")]
    TooManyDefinitions,
    #[error("function or instruction definition {0} not found")]
    InvalidDefinition(usize),
    #[error("ENDF encountered outside of a function or instruction definition")]
    UnexpectedEndFunction,
    #[error("value stack overflow")]
    ValueStackOverflow,
    #[error("value stack underflow")]
    ValueStackUnderflow,
    #[error("call stack overflow")]
    CallStackOverflow,
    #[error("call stack underflow")]
    CallStackUnderflow,
    #[error("stack value {0} was invalid for the current operation")]
    InvalidStackValue(i32),
    #[error("point index {0} was out of bounds")]
    InvalidPointIndex(usize),
    #[error("point range {0}..{1} was out of bounds")]
    InvalidPointRange(usize, usize),
    #[error("contour index {0} was out of bounds")]
    InvalidContourIndex(usize),
    #[error("cvt index {0} was out of bounds")]
    InvalidCvtIndex(usize),
    #[error("storage area index {0} was out of bounds")]
    InvalidStorageIndex(usize),
    #[error("attempt to divide by 0")]
    DivideByZero,
    #[error("zone index {0} was invalid (only 0 or 1 are permitted)")]
    InvalidZoneIndex(i32),
    #[error("attempt to set the loop counter to a negative value")]
    NegativeLoopCounter,
    #[error("the target of a jump instruction was invalid")]
    InvalidJump,
    #[error("too many instructions executed")]
    ExceededExecutionBudget,
}

/// Hinting error with additional context.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HintError {
    pub program: Program,
    pub glyph_id: Option<GlyphId>,
    pub pc: usize,
    pub opcode: Option<u8>,
    pub kind: HintErrorKind,
}

impl std::fmt::Display for HintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        if let Some(glyph_id) = self.glyph_id {
            write!(f, "[{}]", glyph_id.to_u32())?;
        }
        write!(f, "@{}:", self.pc)?;
        if let Some(opcode) = self.opcode {
            write!(f, "{}:", opcode_name(opcode))?;
        }
        write!(f, " {}", self.kind)
    }
}

impl std::error::Error for HintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
