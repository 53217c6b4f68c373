//! Managing the flow of control.
//!
//! Implements 5 instructions. `EIF` is a no-op handled in dispatch.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-flow-of-control>

use super::{Engine, HintErrorKind, OpResult};
use crate::code::opcodes as op;

impl Engine<'_> {
    /// If test.
    ///
    /// IF[] (0x58)
    ///
    /// Pops: e: stack element
    ///
    /// When `e` is zero, skips to the matching `ELSE` or `EIF`, counting
    /// nested `IF` blocks along the way.
    pub(super) fn op_if(&mut self) -> OpResult {
        if self.value_stack.pop()? == 0 {
            self.skip_block(true)?;
        }
        Ok(())
    }

    /// Else.
    ///
    /// ELSE[] (0x1B)
    ///
    /// Only reached when the `IF` branch was taken, so skips to the
    /// matching `EIF`.
    pub(super) fn op_else(&mut self) -> OpResult {
        self.skip_block(false)
    }

    /// Jump relative.
    ///
    /// JMPR[] (0x1C)
    ///
    /// Pops: offset: byte offset from this instruction
    pub(super) fn op_jmpr(&mut self) -> OpResult {
        let offset = self.value_stack.pop()?;
        self.do_jump(true, offset)
    }

    /// Jump relative on true.
    ///
    /// JROT[] (0x78)
    ///
    /// Pops: e: stack element
    ///       offset: byte offset from this instruction
    pub(super) fn op_jrot(&mut self) -> OpResult {
        let e = self.value_stack.pop()?;
        let offset = self.value_stack.pop()?;
        self.do_jump(e != 0, offset)
    }

    /// Jump relative on false.
    ///
    /// JROF[] (0x79)
    ///
    /// Pops: e: stack element
    ///       offset: byte offset from this instruction
    pub(super) fn op_jrof(&mut self) -> OpResult {
        let e = self.value_stack.pop()?;
        let offset = self.value_stack.pop()?;
        self.do_jump(e == 0, offset)
    }

    fn skip_block(&mut self, stop_at_else: bool) -> OpResult {
        let mut nest_depth = 1;
        loop {
            let ins = self
                .program
                .decoder
                .decode()
                .ok_or(HintErrorKind::UnexpectedEndOfBytecode)??;
            match ins.opcode {
                op::IF => nest_depth += 1,
                op::ELSE if stop_at_else && nest_depth == 1 => return Ok(()),
                op::EIF => {
                    nest_depth -= 1;
                    if nest_depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    fn do_jump(&mut self, test: bool, offset: i32) -> OpResult {
        if !test {
            return Ok(());
        }
        // The offset is relative to the jump itself and the decoder has
        // already moved past its single opcode byte.
        let offset = offset.wrapping_sub(1);
        if offset == -1 {
            // jumping to itself would never terminate
            return Err(HintErrorKind::InvalidJump);
        }
        let pc = self
            .program
            .decoder
            .pc
            .checked_add_signed(offset as isize)
            .ok_or(HintErrorKind::InvalidJump)?;
        if let Some(range) = self.program.active_range() {
            // the ENDF following the body is a valid target
            if pc < range.start || pc > range.end {
                return Err(HintErrorKind::InvalidJump);
            }
        }
        self.program.decoder.pc = pc;
        Ok(())
    }
}
