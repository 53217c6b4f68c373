//! Rounding state.

use crate::math;

/// Rounding strategies supported by the interpreter.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum RoundMode {
    /// Round to the closest grid line. Set by `RTG`.
    #[default]
    Grid,
    /// Round to the closest half grid line. Set by `RTHG`.
    HalfGrid,
    /// Round to the closest half or full grid line. Set by `RTDG`.
    DoubleGrid,
    /// Round down to the closest grid line. Set by `RDTG`.
    DownToGrid,
    /// Round up to the closest grid line. Set by `RUTG`.
    UpToGrid,
    /// No rounding. Set by `ROFF`.
    Off,
    /// Rounding to a lattice with configurable period, phase and
    /// threshold. Set by `SROUND`.
    Super,
    /// Like [`Super`](Self::Super) with a period of sqrt(2)/2 pixels.
    /// Set by `S45ROUND`.
    Super45,
}

/// Graphics state that controls rounding.
///
/// See <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM04/Chap4.html#round%20state>
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct RoundState {
    pub mode: RoundMode,
    pub threshold: i32,
    pub phase: i32,
    pub period: i32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            mode: RoundMode::Grid,
            threshold: 0,
            phase: 0,
            period: 64,
        }
    }
}

impl RoundState {
    /// Rounds a 26.6 distance according to the current mode.
    ///
    /// Except for `Off`, rounding never changes the sign of a distance.
    pub fn round(&self, distance: i32) -> i32 {
        match self.mode {
            RoundMode::Grid => symmetric(distance, math::round),
            RoundMode::HalfGrid => symmetric(distance, |d| math::floor(d).wrapping_add(32)),
            RoundMode::DoubleGrid => symmetric(distance, |d| math::round_pad(d, 32)),
            RoundMode::DownToGrid => symmetric(distance, math::floor),
            RoundMode::UpToGrid => symmetric(distance, math::ceil),
            RoundMode::Off => distance,
            RoundMode::Super => self.round_super(distance, |d| d & -self.period),
            RoundMode::Super45 => self.round_super(distance, |d| {
                if self.period != 0 {
                    (d / self.period) * self.period
                } else {
                    d
                }
            }),
        }
    }

    fn round_super(&self, distance: i32, snap: impl Fn(i32) -> i32) -> i32 {
        let bias = self.threshold - self.phase;
        if distance >= 0 {
            let value = snap(distance.wrapping_add(bias)).wrapping_add(self.phase);
            if value < 0 {
                self.phase
            } else {
                value
            }
        } else {
            let value = snap(bias.wrapping_sub(distance))
                .wrapping_neg()
                .wrapping_sub(self.phase);
            if value > 0 {
                -self.phase
            } else {
                value
            }
        }
    }

    /// Configures period, phase and threshold from an `SROUND` or
    /// `S45ROUND` selector.
    ///
    /// `grid_period` is the base period in 2.14: 1 pixel for `SROUND` or
    /// sqrt(2)/2 for `S45ROUND`.
    pub fn set_super(&mut self, mode: RoundMode, grid_period: i32, selector: i32) {
        let period = match selector & 0xC0 {
            0x00 => grid_period / 2,
            0x80 => grid_period * 2,
            // 0xC0 is reserved and treated as the base period
            _ => grid_period,
        };
        let phase = match selector & 0x30 {
            0x00 => 0,
            0x10 => period / 4,
            0x20 => period / 2,
            _ => period * 3 / 4,
        };
        let threshold = match selector & 0x0F {
            0 => period - 1,
            n => (n - 4) * period / 8,
        };
        // 2.14 down to 26.6
        self.mode = mode;
        self.period = period >> 8;
        self.phase = phase >> 8;
        self.threshold = threshold >> 8;
    }
}

fn symmetric(distance: i32, f: impl Fn(i32) -> i32) -> i32 {
    if distance >= 0 {
        f(distance).max(0)
    } else {
        f(distance.wrapping_neg()).wrapping_neg().min(0)
    }
}
