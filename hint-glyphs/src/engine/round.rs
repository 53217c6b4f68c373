//! Managing rounding state and rounding values.
//!
//! Implements 9 instructions. The `NROUND` family is a no-op handled in
//! dispatch.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-round-state>

use super::{Engine, OpResult};
use crate::round::RoundMode;

impl Engine<'_> {
    /// Round to half grid.
    ///
    /// RTHG[] (0x19)
    pub(super) fn op_rthg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::HalfGrid)
    }

    /// Round to grid.
    ///
    /// RTG[] (0x18)
    pub(super) fn op_rtg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::Grid)
    }

    /// Round to double grid.
    ///
    /// RTDG[] (0x3D)
    pub(super) fn op_rtdg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::DoubleGrid)
    }

    /// Round down to grid.
    ///
    /// RDTG[] (0x7D)
    pub(super) fn op_rdtg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::DownToGrid)
    }

    /// Round up to grid.
    ///
    /// RUTG[] (0x7C)
    pub(super) fn op_rutg(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::UpToGrid)
    }

    /// Round off.
    ///
    /// ROFF[] (0x7A)
    pub(super) fn op_roff(&mut self) -> OpResult {
        self.set_round_mode(RoundMode::Off)
    }

    /// Super round.
    ///
    /// SROUND[] (0x76)
    ///
    /// Pops: n: number decomposed to obtain period, phase and threshold
    ///
    /// The period is in units of one pixel.
    pub(super) fn op_sround(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        self.graphics
            .round_state
            .set_super(RoundMode::Super, 0x4000, n);
        Ok(())
    }

    /// Super round 45 degrees.
    ///
    /// S45ROUND[] (0x77)
    ///
    /// Pops: n: number decomposed to obtain period, phase and threshold
    ///
    /// The period is in units of sqrt(2)/2 pixels.
    pub(super) fn op_s45round(&mut self) -> OpResult {
        let n = self.value_stack.pop()?;
        self.graphics
            .round_state
            .set_super(RoundMode::Super45, 0x2D41, n);
        Ok(())
    }

    /// Round value.
    ///
    /// ROUND[ab] (0x68 - 0x6B)
    ///
    /// Pops: n1
    /// Pushes: n2 = n1 rounded with the current round state
    ///
    /// The distance type bits select an engine compensation which is always
    /// zero here.
    pub(super) fn op_round(&mut self) -> OpResult {
        let round_state = self.graphics.round_state;
        self.value_stack.apply_unary(|n| Ok(round_state.round(n)))
    }

    fn set_round_mode(&mut self, mode: RoundMode) -> OpResult {
        self.graphics.round_state.mode = mode;
        Ok(())
    }
}
