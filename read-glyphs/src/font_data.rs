//! raw font bytes

use std::io::SeekFrom;
use std::ops::{Bound, RangeBounds};

use bytemuck::AnyBitPattern;
use font_types::{F2Dot14, Tag};

use crate::ReadError;

/// A scalar type that can be read from big-endian bytes.
pub trait ReadScalar: Sized {
    /// The number of bytes occupied by the encoded value.
    const RAW_BYTE_LEN: usize;

    /// Decodes the value from the start of `bytes`.
    ///
    /// Returns `None` if `bytes` is too short.
    fn read(bytes: &[u8]) -> Option<Self>;
}

macro_rules! int_scalar {
    ($ty:ty, $len:literal) => {
        impl ReadScalar for $ty {
            const RAW_BYTE_LEN: usize = $len;

            #[inline]
            fn read(bytes: &[u8]) -> Option<Self> {
                let raw: [u8; $len] = bytes.get(..$len)?.try_into().ok()?;
                Some(<$ty>::from_be_bytes(raw))
            }
        }
    };
}

int_scalar!(u8, 1);
int_scalar!(i8, 1);
int_scalar!(u16, 2);
int_scalar!(i16, 2);
int_scalar!(u32, 4);
int_scalar!(i32, 4);

impl ReadScalar for Tag {
    const RAW_BYTE_LEN: usize = 4;

    fn read(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(Tag::from_be_bytes(raw))
    }
}

impl ReadScalar for F2Dot14 {
    const RAW_BYTE_LEN: usize = 2;

    fn read(bytes: &[u8]) -> Option<Self> {
        i16::read(bytes).map(F2Dot14::from_bits)
    }
}

macro_rules! be_array_type {
    ($(#[$attr:meta])* $name:ident, $ty:ty, $len:literal) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Default, AnyBitPattern, bytemuck::NoUninit)]
        #[repr(transparent)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Returns the native value.
            #[inline]
            pub fn get(self) -> $ty {
                <$ty>::from_be_bytes(self.0)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.get().fmt(f)
            }
        }
    };
}

be_array_type!(
    /// A big-endian `u16` suitable for zero-copy array reads.
    BeU16,
    u16,
    2
);
be_array_type!(
    /// A big-endian `i16` suitable for zero-copy array reads.
    BeI16,
    i16,
    2
);
be_array_type!(
    /// A big-endian `u32` suitable for zero-copy array reads.
    BeU32,
    u32,
    4
);

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

impl<'a> FontData<'a> {
    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(FontData::new)
    }

    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(FontData::new)
    }

    pub fn read_at<T: ReadScalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Interprets `count` elements starting at `offset` as a slice of `T`.
    pub fn read_array<T: AnyBitPattern>(
        &self,
        offset: usize,
        count: usize,
    ) -> Result<&'a [T], ReadError> {
        let len = count
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(ReadError::OutOfBounds)?;
        let end = offset.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let bytes = self.bytes.get(offset..end).ok_or(ReadError::OutOfBounds)?;
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::MalformedData("unaligned array"))
    }

    pub fn cursor(&self) -> Cursor<'a> {
        Cursor { pos: 0, data: *self }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

/// A sequential, seekable reader over big-endian font data.
///
/// Every read advances the position by the size of the value read. Reads
/// that would pass the end of the data fail with [`ReadError::OutOfBounds`]
/// and leave the position unchanged.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        FontData::new(bytes).cursor()
    }

    /// The current read position, relative to the start of the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The number of bytes left to read.
    pub fn remaining_len(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The unread portion of the data.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        self.data.as_bytes().get(self.pos..).unwrap_or_default()
    }

    pub fn read<T: ReadScalar>(&mut self) -> Result<T, ReadError> {
        let value = self.data.read_at(self.pos)?;
        self.pos += T::RAW_BYTE_LEN;
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.read()
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        self.read()
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        self.read()
    }

    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        self.read()
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        self.read()
    }

    /// Reads a signed 2.14 fixed point value.
    pub fn read_f2dot14(&mut self) -> Result<f32, ReadError> {
        self.read::<F2Dot14>().map(F2Dot14::to_f32)
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let bytes = self
            .data
            .as_bytes()
            .get(self.pos..end)
            .ok_or(ReadError::OutOfBounds)?;
        self.pos = end;
        Ok(bytes)
    }

    /// Reads `count` consecutive elements without copying.
    pub fn read_array<T: AnyBitPattern>(&mut self, count: usize) -> Result<&'a [T], ReadError> {
        let array = self.data.read_array(self.pos, count)?;
        self.pos += std::mem::size_of_val(array);
        Ok(array)
    }

    pub fn advance_by(&mut self, n_bytes: usize) -> Result<(), ReadError> {
        self.seek(SeekFrom::Current(n_bytes as i64)).map(|_| ())
    }

    /// Moves the read position.
    ///
    /// Seeking to exactly the end of the data is allowed; seeking past it
    /// is an error.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<usize, ReadError> {
        let (base, delta) = match pos {
            SeekFrom::Start(offset) => (0i64, offset.min(i64::MAX as u64) as i64),
            SeekFrom::Current(delta) => (self.pos as i64, delta),
            SeekFrom::End(delta) => (self.data.len() as i64, delta),
        };
        let new_pos = base.checked_add(delta).ok_or(ReadError::OutOfBounds)?;
        if new_pos < 0 || new_pos as u64 > self.data.len() as u64 {
            return Err(ReadError::OutOfBounds);
        }
        self.pos = new_pos as usize;
        Ok(self.pos)
    }
}
