//! small utilities for building fixtures

use std::collections::HashMap;

use font_types::Tag;

/// A type that can be written as big-endian bytes.
pub trait BeScalar {
    fn write_be(&self, out: &mut Vec<u8>);
}

macro_rules! be_scalar {
    ($($ty:ty),*) => {
        $(impl BeScalar for $ty {
            fn write_be(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }
        })*
    };
}

be_scalar!(u8, i8, u16, i16, u32, i32);

impl BeScalar for Tag {
    fn write_be(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_be_bytes());
    }
}

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl BeScalar) -> Self {
        item.write_be(&mut self.data);
        self
    }

    /// Write a scalar and remember its position under `tag`.
    pub fn push_with_tag(mut self, item: impl BeScalar, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        item.write_be(&mut self.data);
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: BeScalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            item.write_be(&mut self.data);
        }
        self
    }

    /// Write raw bytes into the buffer.
    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    /// Overwrite the value previously pushed with `tag`.
    pub fn write_at(&mut self, tag: &str, item: impl BeScalar) {
        let offset = self.offset_for(tag);
        let mut raw = Vec::new();
        item.write_be(&mut raw);
        let target = &mut self.data[offset..];
        if target.len() < raw.len() {
            panic!("not enough room left in buffer for the requested write.");
        }
        target[..raw.len()].copy_from_slice(&raw);
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<BeBuffer> for Vec<u8> {
    fn from(buf: BeBuffer) -> Self {
        buf.data
    }
}
