//! Storage for function and instruction definitions.

use std::ops::Range;

use crate::{error::HintErrorKind, program::Program};

/// Code range of a function (`FDEF`) or instruction (`IDEF`) body.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Definition {
    start: u32,
    end: u32,
    /// Function number or opcode.
    key: i32,
    program: Program,
    is_active: bool,
}

impl Definition {
    pub fn new(program: Program, code_range: Range<usize>, key: i32) -> Self {
        Self {
            start: code_range.start as u32,
            end: code_range.end as u32,
            key,
            program,
            is_active: true,
        }
    }

    pub fn program(&self) -> Program {
        self.program
    }

    /// Bytecode range of the body, excluding the `ENDF`.
    pub fn code_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// A table of definitions that is only writable while running the font
/// or control value programs.
#[derive(Debug)]
pub enum DefinitionMap<'a> {
    Ref(&'a [Definition]),
    Mut(&'a mut [Definition]),
}

impl DefinitionMap<'_> {
    /// Returns a slot for the definition with `key`, replacing any
    /// existing definition with the same key.
    pub fn allocate(&mut self, key: i32) -> Result<&mut Definition, HintErrorKind> {
        let Self::Mut(defs) = self else {
            return Err(HintErrorKind::DefinitionInGlyphProgram);
        };
        // Function numbers are normally dense and start at zero so the key
        // usually doubles as the index.
        let direct = usize::try_from(key)
            .ok()
            .filter(|ix| {
                defs.get(*ix)
                    .is_some_and(|def| !def.is_active() || def.key == key)
            });
        let ix = match direct {
            Some(ix) => ix,
            None => {
                // Prefer redefining a matching entry, then the free slot
                // with the highest index.
                let mut free = None;
                let mut found = None;
                for (ix, def) in defs.iter().enumerate().rev() {
                    if def.is_active() {
                        if def.key == key {
                            found = Some(ix);
                            break;
                        }
                    } else if free.is_none() {
                        free = Some(ix);
                    }
                }
                found.or(free).ok_or(HintErrorKind::TooManyDefinitions)?
            }
        };
        let def = defs.get_mut(ix).ok_or(HintErrorKind::TooManyDefinitions)?;
        *def = Definition::new(Program::Font, 0..0, key);
        Ok(def)
    }

    pub fn get(&self, key: i32) -> Result<&Definition, HintErrorKind> {
        let defs = self.as_slice();
        if let Some(def) = usize::try_from(key).ok().and_then(|ix| defs.get(ix)) {
            if def.is_active() && def.key == key {
                return Ok(def);
            }
        }
        defs.iter()
            .rev()
            .find(|def| def.is_active() && def.key == key)
            .ok_or(HintErrorKind::InvalidDefinition(key as usize))
    }

    pub fn as_slice(&self) -> &[Definition] {
        match self {
            Self::Ref(defs) => defs,
            Self::Mut(defs) => defs,
        }
    }

    /// Clears all definitions if the map is writable.
    pub fn reset(&mut self) {
        if let Self::Mut(defs) = self {
            defs.fill(Default::default());
        }
    }
}

/// Function and instruction definitions available to a program.
#[derive(Debug)]
pub struct DefinitionState<'a> {
    pub functions: DefinitionMap<'a>,
    pub instructions: DefinitionMap<'a>,
}

impl<'a> DefinitionState<'a> {
    pub fn new(functions: DefinitionMap<'a>, instructions: DefinitionMap<'a>) -> Self {
        Self {
            functions,
            instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_keys_use_their_index() {
        let mut buf = vec![Definition::default(); 8];
        let mut map = DefinitionMap::Mut(&mut buf);
        for key in 0..8 {
            *map.allocate(key).unwrap() = Definition::new(Program::Font, 0..key as usize, key);
        }
        for (ix, def) in map.as_slice().iter().enumerate() {
            assert_eq!(def.key(), ix as i32);
            assert_eq!(map.get(ix as i32).unwrap().code_range(), 0..ix);
        }
        assert_eq!(map.allocate(8), Err(HintErrorKind::TooManyDefinitions));
        assert_eq!(map.get(8), Err(HintErrorKind::InvalidDefinition(8)));
    }

    #[test]
    fn sparse_keys_fill_from_the_end() {
        let mut buf = vec![Definition::default(); 6];
        let mut map = DefinitionMap::Mut(&mut buf);
        for key in [0, 1, 1000, -7, 3] {
            map.allocate(key).unwrap();
        }
        let keys = map
            .as_slice()
            .iter()
            .map(|def| def.is_active().then_some(def.key()))
            .collect::<Vec<_>>();
        assert_eq!(keys, [Some(0), Some(1), None, Some(3), Some(-7), Some(1000)]);
        assert_eq!(map.get(-7).unwrap().key(), -7);
        assert_eq!(map.get(1000).unwrap().key(), 1000);
    }

    #[test]
    fn redefinition_reuses_slot() {
        let mut buf = vec![Definition::default(); 4];
        let mut map = DefinitionMap::Mut(&mut buf);
        *map.allocate(500).unwrap() = Definition::new(Program::Font, 1..2, 500);
        *map.allocate(500).unwrap() = Definition::new(Program::Font, 5..9, 500);
        assert_eq!(map.as_slice().iter().filter(|d| d.is_active()).count(), 1);
        assert_eq!(map.get(500).unwrap().code_range(), 5..9);
    }

    #[test]
    fn read_only_map() {
        let buf = [Definition::new(Program::Font, 0..4, 0)];
        let mut map = DefinitionMap::Ref(&buf);
        assert_eq!(map.allocate(0), Err(HintErrorKind::DefinitionInGlyphProgram));
        map.reset();
        assert!(map.get(0).is_ok());
    }
}
