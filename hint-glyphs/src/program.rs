//! TrueType program management.

use crate::{
    call_stack::{CallRecord, CallStack},
    code::Decoder,
    definition::Definition,
    error::HintErrorKind,
};

/// Describes the source for a piece of bytecode.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[repr(u8)]
pub enum Program {
    /// Program that initializes the function and instruction tables. Stored
    /// in the `fpgm` table.
    #[default]
    Font = 0,
    /// Program that initializes CVT and storage based on font size and other
    /// parameters. Stored in the `prep` table.
    ControlValue = 1,
    /// Glyph specified program. Stored per-glyph in the `glyf` table.
    Glyph = 2,
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Font => "fpgm",
            Self::ControlValue => "prep",
            Self::Glyph => "glyf",
        })
    }
}

/// State for managing active programs and decoding instructions.
pub struct ProgramState<'a> {
    /// Bytecode for each of the three program types, indexed by `Program`.
    pub bytecode: [&'a [u8]; 3],
    /// The program where execution began.
    pub initial: Program,
    /// The program that owns the instruction being executed.
    pub current: Program,
    pub decoder: Decoder<'a>,
    pub call_stack: CallStack,
}

impl<'a> ProgramState<'a> {
    pub fn new(
        font_code: &'a [u8],
        cv_code: &'a [u8],
        glyph_code: &'a [u8],
        initial_program: Program,
    ) -> Self {
        let bytecode = [font_code, cv_code, glyph_code];
        Self {
            bytecode,
            initial: initial_program,
            current: initial_program,
            decoder: Decoder::new(bytecode[initial_program as usize], 0),
            call_stack: CallStack::default(),
        }
    }

    /// Prepares for execution of `program` from its first instruction.
    pub fn reset(&mut self, program: Program) {
        self.initial = program;
        self.current = program;
        self.decoder = Decoder::new(self.bytecode[program as usize], 0);
        self.call_stack.clear();
    }

    /// Transfers control to the body of `definition`, which will run
    /// `count` times before returning.
    pub fn enter(&mut self, definition: Definition, count: u32) -> Result<(), HintErrorKind> {
        let program = definition.program();
        self.call_stack.push(CallRecord {
            caller_program: self.current,
            return_pc: self.decoder.pc,
            current_count: count,
            definition,
        })?;
        self.current = program;
        self.decoder = Decoder::new(self.bytecode[program as usize], definition.code_range().start);
        Ok(())
    }

    /// Handles the end of a definition body.
    ///
    /// Restarts the body while loop iterations remain, otherwise returns
    /// to the caller.
    pub fn leave(&mut self) -> Result<(), HintErrorKind> {
        let mut record = self.call_stack.pop()?;
        if record.current_count > 1 {
            record.current_count -= 1;
            self.decoder.pc = record.definition.code_range().start;
            self.call_stack.push(record)?;
        } else {
            self.current = record.caller_program;
            self.decoder = Decoder::new(
                self.bytecode[record.caller_program as usize],
                record.return_pc,
            );
        }
        Ok(())
    }

    /// Code range of the innermost active definition, if any.
    pub fn active_range(&self) -> Option<std::ops::Range<usize>> {
        self.call_stack
            .peek()
            .map(|record| record.definition.code_range())
    }
}
