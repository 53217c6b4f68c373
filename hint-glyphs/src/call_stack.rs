//! Tracking function call state.

use crate::{definition::Definition, error::HintErrorKind, program::Program};

/// Maximum nesting depth of `CALL`/`LOOPCALL` and instruction
/// definition invocations.
pub const MAX_CALL_DEPTH: usize = 128;

/// Saved state for a single function or instruction invocation.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct CallRecord {
    pub caller_program: Program,
    pub return_pc: usize,
    /// Remaining iterations for `LOOPCALL`; 1 for a plain call.
    pub current_count: u32,
    pub definition: Definition,
}

/// Bounded stack of active calls.
#[derive(Clone, Default, Debug)]
pub struct CallStack {
    records: Vec<CallRecord>,
}

impl CallStack {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn push(&mut self, record: CallRecord) -> Result<(), HintErrorKind> {
        if self.records.len() >= MAX_CALL_DEPTH {
            return Err(HintErrorKind::CallStackOverflow);
        }
        self.records.push(record);
        Ok(())
    }

    pub fn peek(&self) -> Option<&CallRecord> {
        self.records.last()
    }

    pub fn pop(&mut self) -> Result<CallRecord, HintErrorKind> {
        self.records.pop().ok_or(HintErrorKind::CallStackUnderflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pc: usize) -> CallRecord {
        CallRecord {
            caller_program: Program::Glyph,
            return_pc: pc,
            current_count: 1,
            definition: Definition::new(Program::Font, 0..10, 0),
        }
    }

    #[test]
    fn push_peek_pop() {
        let mut stack = CallStack::default();
        assert!(stack.peek().is_none());
        stack.push(record(5)).unwrap();
        stack.push(record(9)).unwrap();
        assert_eq!(stack.peek().map(|r| r.return_pc), Some(9));
        assert_eq!(stack.pop().unwrap().return_pc, 9);
        assert_eq!(stack.pop().unwrap().return_pc, 5);
        assert_eq!(stack.pop(), Err(HintErrorKind::CallStackUnderflow));
    }

    #[test]
    fn depth_limit() {
        let mut stack = CallStack::default();
        for i in 0..MAX_CALL_DEPTH {
            stack.push(record(i)).unwrap();
        }
        assert_eq!(stack.len(), MAX_CALL_DEPTH);
        assert_eq!(stack.push(record(0)), Err(HintErrorKind::CallStackOverflow));
        stack.clear();
        assert!(stack.is_empty());
    }
}
