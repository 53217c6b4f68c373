//! Value stack for TrueType interpreter.

use crate::{code::InlineOperands, error::HintErrorKind};

use HintErrorKind::{InvalidStackValue, ValueStackOverflow, ValueStackUnderflow};

/// Fixed capacity stack of 32-bit values over caller provided storage.
///
/// Capacity comes from the `maxp` table so overflow is an error rather
/// than a reallocation.
pub struct ValueStack<'a> {
    values: &'a mut [i32],
    top: usize,
}

impl<'a> ValueStack<'a> {
    pub fn new(values: &'a mut [i32]) -> Self {
        Self { values, top: 0 }
    }

    pub fn len(&self) -> usize {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    /// Returns the active portion of the stack, bottom first.
    pub fn values(&self) -> &[i32] {
        &self.values[..self.top]
    }

    pub fn push(&mut self, value: i32) -> Result<(), HintErrorKind> {
        let slot = self.values.get_mut(self.top).ok_or(ValueStackOverflow)?;
        *slot = value;
        self.top += 1;
        Ok(())
    }

    /// Pushes all operands of an inline push instruction.
    pub fn push_inline(&mut self, operands: &InlineOperands) -> Result<(), HintErrorKind> {
        let count = operands.len();
        let dest = self
            .values
            .get_mut(self.top..self.top + count)
            .ok_or(ValueStackOverflow)?;
        for (slot, value) in dest.iter_mut().zip(operands.values()) {
            *slot = value;
        }
        self.top += count;
        Ok(())
    }

    pub fn peek(&self) -> Option<i32> {
        self.values.get(self.top.checked_sub(1)?).copied()
    }

    pub fn pop(&mut self) -> Result<i32, HintErrorKind> {
        let value = self.peek().ok_or(ValueStackUnderflow)?;
        self.top -= 1;
        Ok(value)
    }

    /// Pops a value used as an index.
    ///
    /// Negative values become out of range indices rather than errors so
    /// that callers report the failure against the table being indexed.
    pub fn pop_usize(&mut self) -> Result<usize, HintErrorKind> {
        Ok(self.pop()? as usize)
    }

    /// Pops a value, applies `op` and pushes the result.
    pub fn apply_unary(
        &mut self,
        mut op: impl FnMut(i32) -> Result<i32, HintErrorKind>,
    ) -> Result<(), HintErrorKind> {
        let a = self.pop()?;
        self.push(op(a)?)
    }

    /// Pops `b` then `a`, and pushes `op(a, b)`.
    pub fn apply_binary(
        &mut self,
        mut op: impl FnMut(i32, i32) -> Result<i32, HintErrorKind>,
    ) -> Result<(), HintErrorKind> {
        let b = self.pop()?;
        let a = self.pop()?;
        self.push(op(a, b)?)
    }

    pub fn clear(&mut self) {
        self.top = 0;
    }

    pub fn dup(&mut self) -> Result<(), HintErrorKind> {
        let value = self.peek().ok_or(ValueStackUnderflow)?;
        self.push(value)
    }

    pub fn swap(&mut self) -> Result<(), HintErrorKind> {
        let a = self.pop()?;
        let b = self.pop()?;
        self.push(a)?;
        self.push(b)
    }

    /// Replaces the index on top of the stack with a copy of the element
    /// that many places below it.
    pub fn copy_index(&mut self) -> Result<(), HintErrorKind> {
        let (top_ix, element_ix) = self.indexed_element()?;
        self.values[top_ix] = self.values[element_ix];
        Ok(())
    }

    /// Pops an index and moves the element that many places below the
    /// top to the top.
    pub fn move_index(&mut self) -> Result<(), HintErrorKind> {
        let (top_ix, element_ix) = self.indexed_element()?;
        let value = self.values[element_ix];
        self.values.copy_within(element_ix + 1..top_ix, element_ix);
        self.values[top_ix - 1] = value;
        self.top -= 1;
        Ok(())
    }

    /// Rotates the top three elements, moving the third to the top.
    pub fn roll(&mut self) -> Result<(), HintErrorKind> {
        let a = self.pop()?;
        let b = self.pop()?;
        let c = self.pop()?;
        self.push(b)?;
        self.push(a)?;
        self.push(c)
    }

    fn indexed_element(&self) -> Result<(usize, usize), HintErrorKind> {
        let top_ix = self.top.checked_sub(1).ok_or(ValueStackUnderflow)?;
        let index = self.values[top_ix];
        if index <= 0 {
            return Err(InvalidStackValue(index));
        }
        let element_ix = top_ix
            .checked_sub(index as usize)
            .ok_or(ValueStackUnderflow)?;
        Ok((top_ix, element_ix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Decoder;

    fn stack_with<'a>(buf: &'a mut [i32], values: &[i32]) -> ValueStack<'a> {
        let mut stack = ValueStack::new(buf);
        for value in values {
            stack.push(*value).unwrap();
        }
        stack
    }

    #[test]
    fn push_pop_limits() {
        let mut buf = [0; 3];
        let mut stack = stack_with(&mut buf, &[1, 2, 3]);
        assert_eq!(stack.push(4), Err(ValueStackOverflow));
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Ok(1));
        assert_eq!(stack.pop(), Err(ValueStackUnderflow));
        assert_eq!(stack.peek(), None);
    }

    #[test]
    fn push_inline_operands() {
        // PUSHW[2] -5 2845 32767
        let code = [0xBA, 0xFF, 0xFB, 0x0B, 0x1D, 0x7F, 0xFF];
        let ins = Decoder::new(&code, 0).decode().unwrap().unwrap();
        let mut buf = [0; 4];
        let mut stack = ValueStack::new(&mut buf);
        stack.push_inline(&ins.inline_operands).unwrap();
        assert_eq!(stack.values(), [-5, 2845, 32767]);
        assert_eq!(stack.push_inline(&ins.inline_operands), Err(ValueStackOverflow));
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn dup_swap_roll() {
        let mut buf = [0; 8];
        let mut stack = stack_with(&mut buf, &[1, 2, 3]);
        stack.dup().unwrap();
        assert_eq!(stack.values(), [1, 2, 3, 3]);
        stack.swap().unwrap();
        stack.pop().unwrap();
        stack.swap().unwrap();
        assert_eq!(stack.values(), [1, 3, 2]);
        stack.roll().unwrap();
        assert_eq!(stack.values(), [3, 2, 1]);
        stack.clear();
        assert_eq!(stack.dup(), Err(ValueStackUnderflow));
        assert_eq!(stack.roll(), Err(ValueStackUnderflow));
    }

    #[test]
    fn cindex_and_mindex() {
        let mut buf = [0; 8];
        let mut stack = stack_with(&mut buf, &[10, 20, 30, 40, 3]);
        stack.copy_index().unwrap();
        assert_eq!(stack.values(), [10, 20, 30, 40, 20]);
        stack.push(4).unwrap();
        stack.move_index().unwrap();
        assert_eq!(stack.values(), [10, 30, 40, 20, 20]);
        stack.push(1).unwrap();
        stack.move_index().unwrap();
        assert_eq!(stack.values(), [10, 30, 40, 20, 20]);
        stack.push(9).unwrap();
        assert_eq!(stack.copy_index(), Err(ValueStackUnderflow));
        stack.pop().unwrap();
        stack.push(0).unwrap();
        assert_eq!(stack.move_index(), Err(InvalidStackValue(0)));
    }

    #[test]
    fn unary_and_binary() {
        let mut buf = [0; 4];
        let mut stack = stack_with(&mut buf, &[7, 2]);
        stack.apply_binary(|a, b| Ok(a - b)).unwrap();
        assert_eq!(stack.values(), [5]);
        stack.apply_unary(|a| Ok(-a)).unwrap();
        assert_eq!(stack.values(), [-5]);
        assert_eq!(stack.apply_binary(|a, b| Ok(a + b)), Err(ValueStackUnderflow));
    }
}
