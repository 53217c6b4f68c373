//! Composite glyph records and their resolution into flat outlines.

use std::sync::Arc;

use font_types::GlyphId;

use crate::{
    flags::CompositeGlyphFlags,
    glyf::{GlyphHeader, GlyphKind},
    Bounds, Cursor, GlyphVector, ReadError, Transform,
};

/// A reference to another glyph. Part of a [`CompositeGlyph`].
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub flags: CompositeGlyphFlags,
    pub glyph: GlyphId,
    /// Component transformation matrix, including the offset.
    pub transform: Transform,
}

/// A decoded composite glyph record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompositeGlyph {
    pub components: Vec<Component>,
    pub bounds: Bounds,
    pub instructions: Vec<u8>,
}

impl CompositeGlyph {
    /// Decodes a complete composite glyph record from `glyf`.
    pub fn read(data: &[u8]) -> Result<Self, ReadError> {
        let mut cursor = Cursor::new(data);
        let header = GlyphHeader::read(&mut cursor)?;
        if header.kind() != GlyphKind::Composite {
            return Err(ReadError::MalformedData("expected a composite glyph"));
        }
        let (components, have_instructions) = read_components(&mut cursor)?;
        let instructions = if have_instructions {
            let len = cursor.read_u16()? as usize;
            cursor.read_bytes(len)?.to_vec()
        } else {
            Vec::new()
        };
        Ok(Self {
            components,
            bounds: header.bounds(),
            instructions,
        })
    }

    /// Flattens the composite into a single outline.
    ///
    /// Each referenced glyph is obtained through `fetch` and transformed
    /// into a fresh copy, so shared glyphs are never modified.
    pub fn resolve(
        &self,
        mut fetch: impl FnMut(GlyphId) -> Result<Arc<GlyphVector>, ReadError>,
    ) -> Result<GlyphVector, ReadError> {
        let mut glyph = GlyphVector {
            bounds: self.bounds,
            instructions: self.instructions.clone(),
            is_composite: true,
            ..Default::default()
        };
        for component in &self.components {
            let base = fetch(component.glyph)?;
            if component.transform.is_identity() {
                glyph.append(&base)?;
            } else {
                glyph.append(&base.transform(&component.transform))?;
            }
        }
        Ok(glyph)
    }
}

/// Reads component records until one without `MORE_COMPONENTS`.
///
/// Returns the components and whether the final flags request trailing
/// instructions.
pub fn read_components(cursor: &mut Cursor) -> Result<(Vec<Component>, bool), ReadError> {
    let mut components = Vec::new();
    loop {
        let component = read_component(cursor)?;
        let flags = component.flags;
        components.push(component);
        if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
            let have_instructions = flags.contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS);
            return Ok((components, have_instructions));
        }
    }
}

fn read_component(cursor: &mut Cursor) -> Result<Component, ReadError> {
    let flags = CompositeGlyphFlags::from_bits_truncate(cursor.read_u16()?);
    let glyph = GlyphId::new(cursor.read_u16()? as u32);
    let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
    let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
    // Point matching is not supported; point numbers are applied as an
    // unsigned offset.
    let (dx, dy) = match (args_are_xy_values, args_are_words) {
        (true, true) => (cursor.read_i16()? as f32, cursor.read_i16()? as f32),
        (true, false) => (cursor.read_i8()? as f32, cursor.read_i8()? as f32),
        (false, true) => (cursor.read_u16()? as f32, cursor.read_u16()? as f32),
        (false, false) => (cursor.read_u8()? as f32, cursor.read_u8()? as f32),
    };
    let mut transform = Transform::translation(dx, dy);
    if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
        transform.xx = cursor.read_f2dot14()?;
        transform.yy = transform.xx;
    } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
        transform.xx = cursor.read_f2dot14()?;
        transform.yy = cursor.read_f2dot14()?;
    } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
        transform.xx = cursor.read_f2dot14()?;
        transform.yx = cursor.read_f2dot14()?;
        transform.xy = cursor.read_f2dot14()?;
        transform.yy = cursor.read_f2dot14()?;
    }
    Ok(Component {
        flags,
        glyph,
        transform,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyf::decode_simple_glyph;
    use glyph_test_data::{glyf, BeBuffer};
    use pretty_assertions::assert_eq;

    const XY_WORDS: u16 = 0x0003;
    const MORE: u16 = 0x0020;

    fn square() -> Result<Arc<GlyphVector>, ReadError> {
        decode_simple_glyph(glyf::SQUARE).map(Arc::new)
    }

    #[test]
    fn argument_formats() {
        let data = BeBuffer::new()
            .extend([-1i16, 0, 0, 0, 0])
            // signed words
            .extend([XY_WORDS | MORE, 1])
            .extend([-10i16, 20])
            // signed bytes
            .extend([0x0002 | MORE, 2u16])
            .extend([-3i8, 4])
            // unsigned point numbers, bytes
            .extend([MORE, 3u16])
            .extend([200u8, 1])
            // unsigned point numbers, words
            .extend([0x0001u16, 4])
            .extend([40000u16, 2]);
        let composite = CompositeGlyph::read(&data).unwrap();
        let offsets = composite
            .components
            .iter()
            .map(|c| (c.glyph.to_u32(), c.transform.dx, c.transform.dy))
            .collect::<Vec<_>>();
        assert_eq!(
            offsets,
            [
                (1, -10.0, 20.0),
                (2, -3.0, 4.0),
                (3, 200.0, 1.0),
                (4, 40000.0, 2.0)
            ]
        );
        assert!(composite.instructions.is_empty());
    }

    #[test]
    fn scale_formats() {
        let data = BeBuffer::new()
            .extend([-1i16, 0, 0, 0, 0])
            .extend([XY_WORDS | MORE | 0x0008, 1])
            .extend([0i16, 0])
            .push(0x2000i16)
            .extend([XY_WORDS | MORE | 0x0040, 1])
            .extend([0i16, 0])
            .extend([0x4000i16, -0x4000])
            .extend([XY_WORDS | 0x0080 | 0x0100, 1])
            .extend([5i16, 6])
            .extend([0i16, 0x4000, -0x4000, 0])
            // instructions
            .push(3u16)
            .extend([1u8, 2, 3]);
        let composite = CompositeGlyph::read(&data).unwrap();
        let transforms = composite
            .components
            .iter()
            .map(|c| c.transform.as_array())
            .collect::<Vec<_>>();
        assert_eq!(
            transforms,
            [
                [0.5, 0.0, 0.0, 0.5, 0.0, 0.0],
                [1.0, 0.0, 0.0, -1.0, 0.0, 0.0],
                [0.0, 1.0, -1.0, 0.0, 5.0, 6.0],
            ]
        );
        assert_eq!(composite.instructions, [1, 2, 3]);
    }

    #[test]
    fn identity_component_matches_base() {
        let composite = CompositeGlyph {
            components: vec![Component {
                flags: CompositeGlyphFlags::ARGS_ARE_XY_VALUES,
                glyph: GlyphId::new(1),
                transform: Transform::IDENTITY,
            }],
            ..Default::default()
        };
        let base = square().unwrap();
        let resolved = composite.resolve(|_| square()).unwrap();
        assert_eq!(resolved.control_points, base.control_points);
        assert_eq!(resolved.end_points, base.end_points);
        assert!(resolved.is_composite);
    }

    #[test]
    fn components_are_transformed_copies() {
        let composite = CompositeGlyph::read(glyf::TWO_SQUARES).unwrap();
        let base = square().unwrap();
        let shared = base.clone();
        let resolved = composite
            .resolve(|gid| {
                assert_eq!(gid, GlyphId::new(1));
                Ok(shared.clone())
            })
            .unwrap();
        // the shared glyph is untouched
        assert_eq!(*shared, *base);
        assert_eq!(resolved.end_points, [3, 7]);
        assert_eq!(resolved.control_points.len(), 8);
        assert_eq!(resolved.control_points[4].position.x, 200.0);
        assert_eq!(resolved.control_points[6].position.y, 150.0);
        assert_eq!(resolved.bounds, Bounds::new(0.0, 0.0, 300.0, 150.0));
    }

    #[test]
    fn fetch_errors_propagate() {
        let composite = CompositeGlyph::read(glyf::TWO_SQUARES).unwrap();
        let result = composite.resolve(|gid| Err(ReadError::GlyphOutOfRange(gid)));
        assert_eq!(result, Err(ReadError::GlyphOutOfRange(GlyphId::new(1))));
    }

    #[test]
    fn truncated_component() {
        let data = BeBuffer::new()
            .extend([-1i16, 0, 0, 0, 0])
            .extend([XY_WORDS | 0x0008, 1])
            .extend([0i16, 0]);
        assert_eq!(CompositeGlyph::read(&data), Err(ReadError::OutOfBounds));
    }
}
