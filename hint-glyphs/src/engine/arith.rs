//! Arithmetic and math instructions.
//!
//! Implements 10 instructions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#arithmetic-and-math-instructions>

use super::{Engine, HintErrorKind, OpResult};
use crate::math;

impl Engine<'_> {
    /// ADD[] (0x60)
    ///
    /// Pops: n1, n2 (F26Dot6)
    /// Pushes: n2 + n1
    pub(super) fn op_add(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok(a.wrapping_add(b)))
    }

    /// SUB[] (0x61)
    ///
    /// Pops: n1, n2 (F26Dot6)
    /// Pushes: n2 - n1
    pub(super) fn op_sub(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok(a.wrapping_sub(b)))
    }

    /// DIV[] (0x62)
    ///
    /// Pops: n1, n2 (F26Dot6)
    /// Pushes: n2 * 64 / n1, truncated
    pub(super) fn op_div(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| {
            if b == 0 {
                Err(HintErrorKind::DivideByZero)
            } else {
                Ok(math::mul_div_no_round(a, 64, b))
            }
        })
    }

    /// MUL[] (0x63)
    ///
    /// Pops: n1, n2 (F26Dot6)
    /// Pushes: n2 * n1 / 64, rounded
    pub(super) fn op_mul(&mut self) -> OpResult {
        self.value_stack
            .apply_binary(|a, b| Ok(math::mul_div(a, b, 64)))
    }

    /// ABS[] (0x64)
    pub(super) fn op_abs(&mut self) -> OpResult {
        self.value_stack.apply_unary(|n| Ok(n.wrapping_abs()))
    }

    /// NEG[] (0x65)
    pub(super) fn op_neg(&mut self) -> OpResult {
        self.value_stack.apply_unary(|n| Ok(n.wrapping_neg()))
    }

    /// FLOOR[] (0x66)
    pub(super) fn op_floor(&mut self) -> OpResult {
        self.value_stack.apply_unary(|n| Ok(math::floor(n)))
    }

    /// CEILING[] (0x67)
    pub(super) fn op_ceiling(&mut self) -> OpResult {
        self.value_stack.apply_unary(|n| Ok(math::ceil(n)))
    }

    /// MAX[] (0x8B)
    pub(super) fn op_max(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok(a.max(b)))
    }

    /// MIN[] (0x8C)
    pub(super) fn op_min(&mut self) -> OpResult {
        self.value_stack.apply_binary(|a, b| Ok(a.min(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Engine, MockEngine, OpResult};
    use crate::error::HintErrorKind;

    fn binary<'a>(
        engine: &mut Engine<'a>,
        op: fn(&mut Engine<'a>) -> OpResult,
        a: i32,
        b: i32,
    ) -> i32 {
        engine.value_stack.push(a).unwrap();
        engine.value_stack.push(b).unwrap();
        op(engine).unwrap();
        engine.value_stack.pop().unwrap()
    }

    fn unary<'a>(engine: &mut Engine<'a>, op: fn(&mut Engine<'a>) -> OpResult, a: i32) -> i32 {
        engine.value_stack.push(a).unwrap();
        op(engine).unwrap();
        engine.value_stack.pop().unwrap()
    }

    #[test]
    fn add_sub_max_min() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        assert_eq!(binary(&mut engine, Engine::op_add, 100, -36), 64);
        assert_eq!(binary(&mut engine, Engine::op_sub, 100, -36), 136);
        assert_eq!(binary(&mut engine, Engine::op_max, -5, 3), 3);
        assert_eq!(binary(&mut engine, Engine::op_min, -5, 3), -5);
        assert!(engine.value_stack.is_empty());
    }

    #[test]
    fn fixed_point_mul_div() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        // 1.5 * 2.0 = 3.0
        assert_eq!(binary(&mut engine, Engine::op_mul, 96, 128), 192);
        // 3.0 / -2.0 = -1.5
        assert_eq!(binary(&mut engine, Engine::op_div, 192, -128), -96);
        // 1/64 / 3.0 truncates to zero
        assert_eq!(binary(&mut engine, Engine::op_div, 1, 192), 0);
    }

    #[test]
    fn divide_by_zero() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.value_stack.push(64).unwrap();
        engine.value_stack.push(0).unwrap();
        assert_eq!(engine.op_div(), Err(HintErrorKind::DivideByZero));
    }

    #[test]
    fn unary_ops() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        assert_eq!(unary(&mut engine, Engine::op_abs, -70), 70);
        assert_eq!(unary(&mut engine, Engine::op_neg, 70), -70);
        assert_eq!(unary(&mut engine, Engine::op_floor, 127), 64);
        assert_eq!(unary(&mut engine, Engine::op_floor, -1), -64);
        assert_eq!(unary(&mut engine, Engine::op_ceiling, 65), 128);
        assert_eq!(unary(&mut engine, Engine::op_ceiling, -65), -64);
    }
}
