//! Managing the storage area.
//!
//! Implements 2 instructions.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/tt_instructions#managing-the-storage-area>

use super::{Engine, HintErrorKind, OpResult};

impl Engine<'_> {
    /// Read store.
    ///
    /// RS[] (0x43)
    ///
    /// Pops: location: storage area index
    /// Pushes: value: storage area value
    pub(super) fn op_rs(&mut self) -> OpResult {
        let location = self.value_stack.pop_usize()?;
        let value = self
            .storage
            .get(location)
            .ok_or(HintErrorKind::InvalidStorageIndex(location))?;
        self.value_stack.push(value)
    }

    /// Write store.
    ///
    /// WS[] (0x42)
    ///
    /// Pops: value: storage area value
    ///       location: storage area index
    pub(super) fn op_ws(&mut self) -> OpResult {
        let value = self.value_stack.pop()?;
        let location = self.value_stack.pop_usize()?;
        self.storage
            .set(location, value)
            .ok_or(HintErrorKind::InvalidStorageIndex(location))
    }
}

#[cfg(test)]
mod tests {
    use super::super::MockEngine;
    use crate::{code::opcodes as op, error::HintErrorKind, program::Program};

    #[test]
    fn write_then_read() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        #[rustfmt::skip]
        let code = [
            op::PUSHB000 + 1, 5, 77,
            op::WS,
            op::PUSHB000, 5,
            op::RS,
            op::PUSHB000, 6,
            op::RS,
        ];
        engine.set_code(Program::Font, &code);
        engine.run().unwrap();
        assert_eq!(engine.value_stack.values(), &[77, 0]);
        assert_eq!(engine.storage.get(5), Some(77));
    }

    #[test]
    fn out_of_bounds() {
        let mut mock = MockEngine::new();
        let mut engine = mock.engine();
        engine.value_stack.push(32).unwrap();
        assert_eq!(engine.op_rs(), Err(HintErrorKind::InvalidStorageIndex(32)));
        engine.value_stack.push(-1).unwrap();
        engine.value_stack.push(0).unwrap();
        assert_eq!(
            engine.op_ws(),
            Err(HintErrorKind::InvalidStorageIndex(usize::MAX))
        );
    }
}
