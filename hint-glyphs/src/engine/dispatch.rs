//! Instruction decoding and dispatch.

use super::{Engine, OpResult};
use crate::{
    code::{opcodes as op, Instruction},
    error::{HintError, HintErrorKind},
    graphics::InterpreterVersion,
    program::Program,
};

/// Upper bound on instructions executed by a single program run.
///
/// Guarantees termination of looping or recursive bytecode.
const MAX_RUN_INSTRUCTIONS: usize = 1_000_000;

impl<'a> Engine<'a> {
    /// Resets state for `program` and runs it to completion.
    pub fn run_program(&mut self, program: Program) -> Result<(), HintError> {
        self.reset(program);
        self.run()
    }

    /// Prepares to run `program` from its first instruction.
    pub fn reset(&mut self, program: Program) {
        self.program.reset(program);
        self.graphics.reset();
        self.value_stack.clear();
        match program {
            Program::Font => {
                self.definitions.functions.reset();
                self.definitions.instructions.reset();
                self.graphics.backward_compatibility = false;
            }
            Program::ControlValue => {
                self.graphics.backward_compatibility = false;
            }
            Program::Glyph => {
                // bit 1: glyph programs start from default retained state
                if self.graphics.instruct_control & 2 != 0 {
                    self.graphics.reset_retained();
                }
                // bit 2: the font opts out of backward compatibility
                self.graphics.backward_compatibility = self.graphics.version
                    == InterpreterVersion::V40
                    && self.graphics.instruct_control & 4 == 0;
            }
        }
    }

    /// Decodes and dispatches instructions until the end of the current
    /// program or an error.
    pub fn run(&mut self) -> Result<(), HintError> {
        let mut count = 0;
        while let Some(ins) = self.decode() {
            let ins = ins?;
            self.dispatch(&ins)?;
            count += 1;
            if count > MAX_RUN_INSTRUCTIONS {
                return Err(HintError {
                    program: self.program.current,
                    glyph_id: None,
                    pc: ins.pc,
                    opcode: Some(ins.opcode),
                    kind: HintErrorKind::ExceededExecutionBudget,
                });
            }
        }
        log::trace!(
            "{} finished after {count} instructions",
            self.program.initial
        );
        Ok(())
    }

    fn decode(&mut self) -> Option<Result<Instruction<'a>, HintError>> {
        let pc = self.program.decoder.pc;
        let program = self.program.current;
        let ins = self.program.decoder.decode()?;
        Some(ins.map_err(|kind| HintError {
            program,
            glyph_id: None,
            pc,
            opcode: None,
            kind,
        }))
    }

    /// Executes a single instruction, attaching the program location to
    /// any error.
    pub fn dispatch(&mut self, ins: &Instruction) -> Result<(), HintError> {
        let program = self.program.current;
        self.dispatch_inner(ins).map_err(|kind| HintError {
            program,
            glyph_id: None,
            pc: ins.pc,
            opcode: Some(ins.opcode),
            kind,
        })
    }

    fn dispatch_inner(&mut self, ins: &Instruction) -> OpResult {
        let opcode = ins.opcode;
        match opcode {
            op::SVTCA0..=op::SFVTCA1 => self.op_svtca(opcode),
            op::SPVTL0..=op::SFVTL1 => self.op_svtl(opcode),
            op::SPVFS => self.op_spvfs(),
            op::SFVFS => self.op_sfvfs(),
            op::GPV => self.op_gpv(),
            op::GFV => self.op_gfv(),
            op::SFVTPV => self.op_sfvtpv(),
            op::ISECT => self.op_isect(),
            op::SRP0 => self.op_srp0(),
            op::SRP1 => self.op_srp1(),
            op::SRP2 => self.op_srp2(),
            op::SZP0 => self.op_szp0(),
            op::SZP1 => self.op_szp1(),
            op::SZP2 => self.op_szp2(),
            op::SZPS => self.op_szps(),
            op::SLOOP => self.op_sloop(),
            op::RTG => self.op_rtg(),
            op::RTHG => self.op_rthg(),
            op::SMD => self.op_smd(),
            op::ELSE => self.op_else(),
            op::JMPR => self.op_jmpr(),
            op::SCVTCI => self.op_scvtci(),
            op::SSWCI => self.op_sswci(),
            op::SSW => self.op_ssw(),
            op::DUP => self.op_dup(),
            op::POP => self.op_pop(),
            op::CLEAR => self.op_clear(),
            op::SWAP => self.op_swap(),
            op::DEPTH => self.op_depth(),
            op::CINDEX => self.op_cindex(),
            op::MINDEX => self.op_mindex(),
            op::ALIGNPTS => self.op_alignpts(),
            op::UTP => self.op_utp(),
            op::LOOPCALL => self.op_loopcall(),
            op::CALL => self.op_call(),
            op::FDEF => self.op_fdef(),
            op::ENDF => self.op_endf(),
            op::MDAP0 | op::MDAP1 => self.op_mdap(opcode),
            op::IUP0 | op::IUP1 => self.op_iup(opcode),
            op::SHP0 | op::SHP1 => self.op_shp(opcode),
            op::SHC0 | op::SHC1 => self.op_shc(opcode),
            op::SHZ0 | op::SHZ1 => self.op_shz(opcode),
            op::SHPIX => self.op_shpix(),
            op::IP => self.op_ip(),
            op::MSIRP0 | op::MSIRP1 => self.op_msirp(opcode),
            op::ALIGNRP => self.op_alignrp(),
            op::RTDG => self.op_rtdg(),
            op::MIAP0 | op::MIAP1 => self.op_miap(opcode),
            op::NPUSHB | op::NPUSHW => self.op_push(&ins.inline_operands),
            op::WS => self.op_ws(),
            op::RS => self.op_rs(),
            op::WCVTP => self.op_wcvtp(),
            op::RCVT => self.op_rcvt(),
            op::GC0 | op::GC1 => self.op_gc(opcode),
            op::SCFS => self.op_scfs(),
            op::MD0 | op::MD1 => self.op_md(opcode),
            op::MPPEM => self.op_mppem(),
            op::MPS => self.op_mps(),
            op::FLIPON => self.op_flipon(),
            op::FLIPOFF => self.op_flipoff(),
            // pops an argument in debug builds of other rasterizers
            op::DEBUG => self.op_pop(),
            op::LT => self.op_lt(),
            op::LTEQ => self.op_lteq(),
            op::GT => self.op_gt(),
            op::GTEQ => self.op_gteq(),
            op::EQ => self.op_eq(),
            op::NEQ => self.op_neq(),
            op::ODD => self.op_odd(),
            op::EVEN => self.op_even(),
            op::IF => self.op_if(),
            op::EIF => Ok(()),
            op::AND => self.op_and(),
            op::OR => self.op_or(),
            op::NOT => self.op_not(),
            op::DELTAP1 => self.op_deltap(0),
            op::SDB => self.op_sdb(),
            op::SDS => self.op_sds(),
            op::ADD => self.op_add(),
            op::SUB => self.op_sub(),
            op::DIV => self.op_div(),
            op::MUL => self.op_mul(),
            op::ABS => self.op_abs(),
            op::NEG => self.op_neg(),
            op::FLOOR => self.op_floor(),
            op::CEILING => self.op_ceiling(),
            op::ROUND00..=op::ROUND11 => self.op_round(),
            // engine compensation is always zero
            op::NROUND00..=op::NROUND11 => Ok(()),
            op::WCVTF => self.op_wcvtf(),
            op::DELTAP2 => self.op_deltap(16),
            op::DELTAP3 => self.op_deltap(32),
            op::DELTAC1 => self.op_deltac(0),
            op::DELTAC2 => self.op_deltac(16),
            op::DELTAC3 => self.op_deltac(32),
            op::SROUND => self.op_sround(),
            op::S45ROUND => self.op_s45round(),
            op::JROT => self.op_jrot(),
            op::JROF => self.op_jrof(),
            op::ROFF => self.op_roff(),
            op::RUTG => self.op_rutg(),
            op::RDTG => self.op_rdtg(),
            op::SANGW => self.op_pop(),
            // anti-aliasing hint, ignored
            op::AA => self.op_pop(),
            op::FLIPPT => self.op_flippt(),
            op::FLIPRGON => self.op_fliprgon(),
            op::FLIPRGOFF => self.op_fliprgoff(),
            op::SCANCTRL => self.op_scanctrl(),
            op::SDPVTL0 | op::SDPVTL1 => self.op_sdpvtl(opcode),
            op::GETINFO => self.op_getinfo(),
            op::IDEF => self.op_idef(),
            op::ROLL => self.op_roll(),
            op::MAX => self.op_max(),
            op::MIN => self.op_min(),
            op::SCANTYPE => self.op_scantype(),
            op::INSTCTRL => self.op_instctrl(),
            op::PUSHB000..=op::PUSHW111 => self.op_push(&ins.inline_operands),
            op::MDRP00000..=op::MDRP11111 => self.op_mdrp(opcode),
            op::MIRP00000..=op::MIRP11111 => self.op_mirp(opcode),
            _ => self.op_unknown(opcode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::MockEngine;
    use crate::{
        code::opcodes as op,
        error::HintErrorKind,
        graphics::InterpreterVersion,
        program::Program,
    };

    #[test]
    fn runs_straight_line_code() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        #[rustfmt::skip]
        let code = [
            op::PUSHB000 + 1, 192, 64,
            op::SUB,
            op::PUSHW000, 0xFF, 0x80,
            op::MUL,
        ];
        engine.set_code(Program::Font, &code);
        engine.run().unwrap();
        // (3 - 1) * -2 pixels in 26.6
        assert_eq!(engine.value_stack.values(), &[-256]);
    }

    #[test]
    fn error_carries_location() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        let code = [op::PUSHB000, 1, op::ADD];
        engine.set_code(Program::ControlValue, &code);
        let error = engine.run().unwrap_err();
        assert_eq!(error.program, Program::ControlValue);
        assert_eq!(error.pc, 2);
        assert_eq!(error.opcode, Some(op::ADD));
        assert_eq!(error.kind, HintErrorKind::ValueStackUnderflow);
    }

    #[test]
    fn truncated_push() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        let code = [op::NPUSHB, 3, 1, 2];
        engine.set_code(Program::Font, &code);
        let error = engine.run().unwrap_err();
        assert_eq!(error.kind, HintErrorKind::UnexpectedEndOfBytecode);
        assert_eq!(error.opcode, None);
    }

    #[test]
    fn infinite_loop_hits_budget() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        // push -1; jump back to the push
        #[rustfmt::skip]
        let code = [
            op::PUSHW000, 0xFF, 0xFD,
            op::JMPR,
        ];
        // -3 lands on the PUSHW itself
        engine.set_code(Program::Font, &code);
        let error = engine.run().unwrap_err();
        assert_eq!(error.kind, HintErrorKind::ExceededExecutionBudget);
    }

    #[test]
    fn glyph_reset_sets_backward_compatibility() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.reset(Program::Glyph);
        assert!(engine.graphics.backward_compatibility);
        engine.graphics.instruct_control = 4;
        engine.reset(Program::Glyph);
        assert!(!engine.graphics.backward_compatibility);
        engine.graphics.instruct_control = 0;
        engine.graphics.version = InterpreterVersion::V35;
        engine.reset(Program::Glyph);
        assert!(!engine.graphics.backward_compatibility);
        engine.reset(Program::ControlValue);
        assert!(!engine.graphics.backward_compatibility);
    }

    #[test]
    fn glyph_reset_restores_default_retained_state() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.graphics.min_distance = 0;
        engine.graphics.instruct_control = 2;
        engine.reset(Program::Glyph);
        assert_eq!(engine.graphics.min_distance, 64);
        assert_eq!(engine.graphics.scale, 0x10000);
    }
}
