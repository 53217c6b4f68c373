//! Decoding of individual `glyf` records.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/glyf>

use crate::{
    flags::SimpleGlyphFlags, BeU16, Bounds, ControlPoint, Cursor, GlyphVector, ReadError,
};

/// The size of the header shared by simple and composite glyph records.
pub const GLYPH_HEADER_LEN: usize = 10;

/// The header at the start of every non-empty glyph record.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphHeader {
    /// If >= 0 this is a simple glyph; if negative this is a composite.
    pub number_of_contours: i16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// The kind of glyph described by a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GlyphKind {
    Empty,
    Simple,
    Composite,
}

impl GlyphHeader {
    pub fn read(cursor: &mut Cursor) -> Result<Self, ReadError> {
        Ok(Self {
            number_of_contours: cursor.read_i16()?,
            x_min: cursor.read_i16()?,
            y_min: cursor.read_i16()?,
            x_max: cursor.read_i16()?,
            y_max: cursor.read_i16()?,
        })
    }

    pub fn kind(&self) -> GlyphKind {
        match self.number_of_contours {
            0 => GlyphKind::Empty,
            n if n > 0 => GlyphKind::Simple,
            _ => GlyphKind::Composite,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.x_min as f32,
            self.y_min as f32,
            self.x_max as f32,
            self.y_max as f32,
        )
    }
}

/// Classifies a raw glyph record without decoding it.
pub fn glyph_kind(data: &[u8]) -> Result<GlyphKind, ReadError> {
    if data.is_empty() {
        return Ok(GlyphKind::Empty);
    }
    Ok(GlyphHeader::read(&mut Cursor::new(data))?.kind())
}

/// Decodes a complete simple glyph record.
pub fn decode_simple_glyph(data: &[u8]) -> Result<GlyphVector, ReadError> {
    let mut cursor = Cursor::new(data);
    let header = GlyphHeader::read(&mut cursor)?;
    if header.number_of_contours < 0 {
        return Err(ReadError::MalformedData("expected a simple glyph"));
    }
    read_simple_body(&mut cursor, &header)
}

/// Reads the body of a simple glyph following its header.
///
/// A glyph with zero contours reads nothing further.
pub(crate) fn read_simple_body(
    cursor: &mut Cursor,
    header: &GlyphHeader,
) -> Result<GlyphVector, ReadError> {
    if header.number_of_contours <= 0 {
        return Ok(GlyphVector::empty());
    }
    let end_points = cursor
        .read_array::<BeU16>(header.number_of_contours as usize)?
        .iter()
        .map(|end| end.get())
        .collect::<Vec<_>>();
    let instruction_len = cursor.read_u16()? as usize;
    let instructions = cursor.read_bytes(instruction_len)?.to_vec();
    let num_points = end_points
        .last()
        .map(|end| *end as usize + 1)
        .unwrap_or_default();
    let flags = read_flags(cursor, num_points)?;
    let mut control_points = flags
        .iter()
        .map(|flags| ControlPoint {
            on_curve: flags.contains(SimpleGlyphFlags::ON_CURVE_POINT),
            ..Default::default()
        })
        .collect::<Vec<_>>();
    let mut x = 0i32;
    for (point, flags) in control_points.iter_mut().zip(&flags) {
        x = x.wrapping_add(read_delta(
            cursor,
            *flags,
            SimpleGlyphFlags::X_SHORT_VECTOR,
            SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        )?);
        point.position.x = x as f32;
    }
    let mut y = 0i32;
    for (point, flags) in control_points.iter_mut().zip(&flags) {
        y = y.wrapping_add(read_delta(
            cursor,
            *flags,
            SimpleGlyphFlags::Y_SHORT_VECTOR,
            SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        )?);
        point.position.y = y as f32;
    }
    let glyph = GlyphVector {
        control_points,
        end_points,
        bounds: header.bounds(),
        instructions,
        is_composite: false,
    };
    glyph.validate()?;
    Ok(glyph)
}

/// Expands the run length encoded flag array.
fn read_flags(cursor: &mut Cursor, num_points: usize) -> Result<Vec<SimpleGlyphFlags>, ReadError> {
    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = SimpleGlyphFlags::from_bits_truncate(cursor.read_u8()?);
        let repeats = if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
            cursor.read_u8()? as usize + 1
        } else {
            1
        };
        if flags.len() + repeats > num_points {
            return Err(ReadError::MalformedData("repeat count too large in glyf"));
        }
        flags.extend(std::iter::repeat_n(flag, repeats));
    }
    Ok(flags)
}

fn read_delta(
    cursor: &mut Cursor,
    flags: SimpleGlyphFlags,
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<i32, ReadError> {
    Ok(
        match (flags.contains(short), flags.contains(same_or_positive)) {
            (true, true) => cursor.read_u8()? as i32,
            (true, false) => -(cursor.read_u8()? as i32),
            (false, true) => 0,
            (false, false) => cursor.read_i16()? as i32,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_test_data::{glyf, BeBuffer};
    use pretty_assertions::assert_eq;

    #[test]
    fn square_glyph() {
        let glyph = decode_simple_glyph(glyf::SQUARE).unwrap();
        assert_eq!(glyph.end_points, [3]);
        assert_eq!(
            glyph
                .control_points
                .iter()
                .map(|p| (p.position.x, p.position.y, p.on_curve))
                .collect::<Vec<_>>(),
            [
                (0.0, 0.0, true),
                (0.0, 100.0, true),
                (100.0, 100.0, true),
                (100.0, 0.0, true),
            ]
        );
        assert_eq!(glyph.bounds, Bounds::new(0.0, 0.0, 100.0, 100.0));
        assert!(glyph.instructions.is_empty());
        assert!(!glyph.is_composite);
    }

    #[test]
    fn repeated_flags_and_long_deltas() {
        let data = BeBuffer::new()
            .extend([2i16, -300, -5, 300, 10])
            // end points
            .extend([0u16, 2])
            // instructions
            .push(2u16)
            .extend([0xB0u8, 0x01])
            // flags: one long x/y point, then two on-curve short points
            .push(0x01u8)
            .extend([0x01u8 | 0x02 | 0x04 | 0x08 | 0x10 | 0x20, 1])
            // x deltas
            .push(-300i16)
            .extend([200u8, 200])
            // y deltas
            .push(-5i16)
            .extend([10u8, 5]);
        let glyph = decode_simple_glyph(&data).unwrap();
        assert_eq!(glyph.end_points, [0, 2]);
        assert_eq!(glyph.instructions, [0xB0, 0x01]);
        assert_eq!(
            glyph
                .control_points
                .iter()
                .map(|p| (p.position.x, p.position.y))
                .collect::<Vec<_>>(),
            [(-300.0, -5.0), (-100.0, 5.0), (100.0, 10.0)]
        );
        assert_eq!(glyph.contours().count(), 2);
    }

    #[test]
    fn same_flags_give_zero_delta() {
        let data = BeBuffer::new()
            .extend([1i16, 0, 0, 0, 0])
            .push(1u16)
            .push(0u16)
            // x and y "same" with no short bit
            .extend([0x31u8, 0x31]);
        let glyph = decode_simple_glyph(&data).unwrap();
        assert_eq!(glyph.control_points.len(), 2);
        assert!(glyph
            .control_points
            .iter()
            .all(|p| p.position.x == 0.0 && p.position.y == 0.0));
    }

    #[test]
    fn zero_contours_reads_nothing() {
        // trailing garbage must not be interpreted as coordinates
        let data = BeBuffer::new()
            .extend([0i16, 1, 2, 3, 4])
            .extend([0xFFu8; 3]);
        let glyph = decode_simple_glyph(&data).unwrap();
        assert!(glyph.is_empty());
        assert_eq!(glyph.num_contours(), 0);
        assert_eq!(glyph.bounds, Bounds::default());
        assert_eq!(glyph_kind(&data).unwrap(), GlyphKind::Empty);
    }

    #[test]
    fn truncated_coordinates() {
        let data = &glyf::SQUARE[..glyf::SQUARE.len() - 1];
        assert_eq!(decode_simple_glyph(data), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn flag_repeat_overrun() {
        let data = BeBuffer::new()
            .extend([1i16, 0, 0, 0, 0])
            .push(1u16)
            .push(0u16)
            .extend([0x09u8, 5]);
        assert!(matches!(
            decode_simple_glyph(&data),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn descending_end_points() {
        let data = BeBuffer::new()
            .extend([2i16, 0, 0, 0, 0])
            .extend([1u16, 0])
            .push(0u16)
            .extend([0x31u8, 0x31]);
        assert!(matches!(
            decode_simple_glyph(&data),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn classify_records() {
        assert_eq!(glyph_kind(&[]).unwrap(), GlyphKind::Empty);
        assert_eq!(glyph_kind(glyf::SQUARE).unwrap(), GlyphKind::Simple);
        let composite = BeBuffer::new().extend([-1i16, 0, 0, 0, 0]);
        assert_eq!(glyph_kind(&composite).unwrap(), GlyphKind::Composite);
        assert_eq!(glyph_kind(&[0, 1]), Err(ReadError::OutOfBounds));
    }
}
