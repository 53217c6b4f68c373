//! Copy-on-write buffer for CVT and storage area.

/// Backing store for the CVT and storage area.
///
/// Reads come from `data` until the first write, at which point `data` is
/// copied into the scratch buffer and all further access goes there. This
/// lets glyph programs modify values without disturbing the state produced
/// by the control value program.
pub struct CowSlice<'a> {
    data: &'a [i32],
    data_mut: &'a mut Vec<i32>,
    has_mut: bool,
}

impl<'a> CowSlice<'a> {
    /// Creates a slice that copies `data` into `scratch` on first write.
    pub fn new(data: &'a [i32], scratch: &'a mut Vec<i32>) -> Self {
        scratch.clear();
        Self {
            data,
            data_mut: scratch,
            has_mut: false,
        }
    }

    /// Creates a slice where every write lands directly in `data`.
    pub fn new_mut(data: &'a mut Vec<i32>) -> Self {
        Self {
            data: &[],
            data_mut: data,
            has_mut: true,
        }
    }

    pub fn len(&self) -> usize {
        if self.has_mut {
            self.data_mut.len()
        } else {
            self.data.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<i32> {
        if self.has_mut {
            self.data_mut.get(index).copied()
        } else {
            self.data.get(index).copied()
        }
    }

    /// Writes `value` at `index`, returning `None` if out of bounds.
    pub fn set(&mut self, index: usize, value: i32) -> Option<()> {
        if index >= self.len() {
            return None;
        }
        if !self.has_mut {
            self.data_mut.extend_from_slice(self.data);
            self.has_mut = true;
        }
        *self.data_mut.get_mut(index)? = value;
        Some(())
    }
}
