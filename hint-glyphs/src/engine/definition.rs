//! Defining and using functions and instructions.
//!
//! Implements 5 instructions, plus dispatch of undefined opcodes to
//! instruction definitions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#defining-and-using-functions-and-instructions>

use super::{Engine, HintErrorKind, OpResult};
use crate::{code::opcodes as op, definition::Definition, program::Program};

/// Bodies larger than this are rejected in pedantic mode.
const MAX_DEFINITION_SIZE: usize = u16::MAX as usize;

#[derive(Copy, Clone)]
enum DefKind {
    Function,
    Instruction,
}

impl Engine<'_> {
    /// Function definition.
    ///
    /// FDEF[] (0x2C)
    ///
    /// Pops: f: function identifier number
    ///
    /// Records the body up to the matching `ENDF` without executing it.
    /// Only allowed in the font and control value programs.
    pub(super) fn op_fdef(&mut self) -> OpResult {
        let f = self.value_stack.pop()?;
        self.define(DefKind::Function, f)
    }

    /// End function definition.
    ///
    /// ENDF[] (0x2D)
    pub(super) fn op_endf(&mut self) -> OpResult {
        if self.program.call_stack.is_empty() {
            return Err(HintErrorKind::UnexpectedEndFunction);
        }
        self.program.leave()
    }

    /// Call function.
    ///
    /// CALL[] (0x2B)
    ///
    /// Pops: f: function identifier number
    pub(super) fn op_call(&mut self) -> OpResult {
        let f = self.value_stack.pop()?;
        self.invoke(DefKind::Function, f, 1)
    }

    /// Loop and call function.
    ///
    /// LOOPCALL[] (0x2A)
    ///
    /// Pops: f: function identifier number
    ///       count: number of times to call the function
    ///
    /// A count of zero or less does nothing.
    pub(super) fn op_loopcall(&mut self) -> OpResult {
        let f = self.value_stack.pop()?;
        let count = self.value_stack.pop()?;
        if count <= 0 {
            return Ok(());
        }
        self.invoke(DefKind::Function, f, count as u32)
    }

    /// Instruction definition.
    ///
    /// IDEF[] (0x89)
    ///
    /// Pops: opcode
    ///
    /// Subsequent executions of an otherwise undefined `opcode` run the
    /// body instead of failing.
    pub(super) fn op_idef(&mut self) -> OpResult {
        let opcode = self.value_stack.pop()?;
        self.define(DefKind::Instruction, opcode)
    }

    /// Runs the instruction definition for an opcode the interpreter does
    /// not implement.
    pub(super) fn op_unknown(&mut self, opcode: u8) -> OpResult {
        match self.invoke(DefKind::Instruction, opcode as i32, 1) {
            Err(HintErrorKind::InvalidDefinition(_)) => Err(HintErrorKind::UnhandledOpcode(opcode)),
            result => result,
        }
    }

    fn define(&mut self, kind: DefKind, key: i32) -> OpResult {
        if self.program.initial == Program::Glyph {
            return Err(HintErrorKind::DefinitionInGlyphProgram);
        }
        let program = self.program.current;
        let is_pedantic = self.graphics.is_pedantic;
        let decoder = &mut self.program.decoder;
        let start = decoder.pc;
        let end = loop {
            let ins = decoder
                .decode()
                .ok_or(HintErrorKind::UnexpectedEndOfBytecode)??;
            match ins.opcode {
                op::FDEF | op::IDEF => return Err(HintErrorKind::NestedDefinition),
                op::ENDF => break ins.pc,
                _ => {}
            }
        };
        if is_pedantic && end - start > MAX_DEFINITION_SIZE {
            return Err(HintErrorKind::DefinitionTooLarge);
        }
        let defs = match kind {
            DefKind::Function => &mut self.definitions.functions,
            DefKind::Instruction => &mut self.definitions.instructions,
        };
        *defs.allocate(key)? = Definition::new(program, start..end, key);
        Ok(())
    }

    fn invoke(&mut self, kind: DefKind, key: i32, count: u32) -> OpResult {
        let defs = match kind {
            DefKind::Function => &self.definitions.functions,
            DefKind::Instruction => &self.definitions.instructions,
        };
        let def = *defs.get(key)?;
        self.program.enter(def, count)
    }
}
