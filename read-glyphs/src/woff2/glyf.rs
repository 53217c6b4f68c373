//! Decoding of the transformed `glyf` table.
//!
//! The transform splits the glyph data into parallel streams that are
//! decoded here in a single batch.
//!
//! See <https://www.w3.org/TR/WOFF2/#glyf_table_format>

use std::sync::Arc;

use font_types::GlyphId;

use super::triplet::read_triplet;
use crate::{
    composite::{read_components, CompositeGlyph},
    var_int::read_255_u16,
    BeI16, Bounds, ControlPoint, Cursor, GlyphVector, ReadError, MAX_COMPOSITE_DEPTH,
};

const HEADER_LEN: usize = 36;
const OVERLAP_SIMPLE_BITMAP: u16 = 1;

/// The fixed header of the transformed table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformedGlyfHeader {
    pub option_flags: u16,
    pub num_glyphs: u16,
    pub index_format: u16,
    pub n_contour_stream_size: u32,
    pub n_points_stream_size: u32,
    pub flag_stream_size: u32,
    pub glyph_stream_size: u32,
    pub composite_stream_size: u32,
    pub bbox_stream_size: u32,
    pub instruction_stream_size: u32,
}

impl TransformedGlyfHeader {
    pub fn read(cursor: &mut Cursor) -> Result<Self, ReadError> {
        let _reserved = cursor.read_u16()?;
        Ok(Self {
            option_flags: cursor.read_u16()?,
            num_glyphs: cursor.read_u16()?,
            index_format: cursor.read_u16()?,
            n_contour_stream_size: cursor.read_u32()?,
            n_points_stream_size: cursor.read_u32()?,
            flag_stream_size: cursor.read_u32()?,
            glyph_stream_size: cursor.read_u32()?,
            composite_stream_size: cursor.read_u32()?,
            bbox_stream_size: cursor.read_u32()?,
            instruction_stream_size: cursor.read_u32()?,
        })
    }
}

/// The substreams of the transformed table.
struct Streams<'a> {
    n_contour: Cursor<'a>,
    n_points: Cursor<'a>,
    flags: Cursor<'a>,
    glyphs: Cursor<'a>,
    composites: Cursor<'a>,
    bbox: Cursor<'a>,
    instructions: Cursor<'a>,
}

impl<'a> Streams<'a> {
    fn new(header: &TransformedGlyfHeader, cursor: &mut Cursor<'a>) -> Result<Self, ReadError> {
        let mut next = |size: u32| cursor.read_bytes(size as usize).map(Cursor::new);
        Ok(Self {
            n_contour: next(header.n_contour_stream_size)?,
            n_points: next(header.n_points_stream_size)?,
            flags: next(header.flag_stream_size)?,
            glyphs: next(header.glyph_stream_size)?,
            composites: next(header.composite_stream_size)?,
            bbox: next(header.bbox_stream_size)?,
            instructions: next(header.instruction_stream_size)?,
        })
    }
}

/// Per glyph state accumulated across the decoding passes.
#[derive(Default)]
enum Slot {
    #[default]
    Empty,
    Simple(GlyphVector),
    Composite(CompositeGlyph),
    /// A composite currently being resolved.
    InProgress,
    /// A finished glyph and its nesting height.
    Done(Arc<GlyphVector>, usize),
}

/// Decodes every glyph of a transformed `glyf` table.
pub fn decode_transformed_glyf(data: &[u8]) -> Result<Vec<Arc<GlyphVector>>, ReadError> {
    let mut cursor = Cursor::new(data);
    let header = TransformedGlyfHeader::read(&mut cursor)?;
    debug_assert_eq!(cursor.position(), HEADER_LEN);
    let mut streams = Streams::new(&header, &mut cursor)?;
    if header.option_flags & OVERLAP_SIMPLE_BITMAP != 0 {
        log::trace!("ignoring overlap simple bitmap");
    }
    let num_glyphs = header.num_glyphs as usize;
    let n_contours = streams
        .n_contour
        .read_array::<BeI16>(num_glyphs)?
        .iter()
        .map(|n| n.get())
        .collect::<Vec<_>>();
    let mut slots = Vec::with_capacity(num_glyphs);
    let mut instruction_lens = vec![0usize; num_glyphs];
    for (gid, n_contour) in n_contours.iter().copied().enumerate() {
        let slot = if n_contour > 0 {
            let glyph = read_simple_points(&mut streams, n_contour as usize)?;
            instruction_lens[gid] = read_255_u16(&mut streams.glyphs)? as usize;
            Slot::Simple(glyph)
        } else if n_contour < 0 {
            let (components, have_instructions) = read_components(&mut streams.composites)?;
            if have_instructions {
                instruction_lens[gid] = read_255_u16(&mut streams.glyphs)? as usize;
            }
            Slot::Composite(CompositeGlyph {
                components,
                ..Default::default()
            })
        } else {
            Slot::Empty
        };
        slots.push(slot);
    }
    read_bounds(&mut streams.bbox, &mut slots)?;
    for (slot, len) in slots.iter_mut().zip(&instruction_lens) {
        if *len == 0 {
            continue;
        }
        let instructions = streams.instructions.read_bytes(*len)?.to_vec();
        match slot {
            Slot::Simple(glyph) => glyph.instructions = instructions,
            Slot::Composite(composite) => composite.instructions = instructions,
            _ => {}
        }
    }
    let mut resolver = CompositeResolver { slots };
    Ok((0..num_glyphs)
        .map(|ix| {
            resolver
                .resolve(GlyphId::new(ix as u32), 0)
                .map(|(glyph, _)| glyph)
                .unwrap_or_else(|err| {
                    log::warn!("failed to resolve WOFF2 glyph {ix}: {err}");
                    Arc::new(GlyphVector::empty())
                })
        })
        .collect())
}

/// Decodes the points of one simple glyph from the point count, flag and
/// glyph streams.
fn read_simple_points(streams: &mut Streams, n_contours: usize) -> Result<GlyphVector, ReadError> {
    let mut end_points = Vec::with_capacity(n_contours);
    let mut num_points = 0usize;
    for _ in 0..n_contours {
        let count = read_255_u16(&mut streams.n_points)? as usize;
        if count == 0 {
            return Err(ReadError::MalformedData("contour with no points"));
        }
        num_points += count;
        let end = u16::try_from(num_points - 1)
            .map_err(|_| ReadError::MalformedData("too many points in glyph"))?;
        end_points.push(end);
    }
    let flags = streams.flags.read_bytes(num_points)?;
    let mut control_points = Vec::with_capacity(num_points);
    let (mut x, mut y) = (0i32, 0i32);
    for flag in flags {
        let (dx, dy, on_curve) = read_triplet(*flag, &mut streams.glyphs)?;
        x = x.wrapping_add(dx);
        y = y.wrapping_add(dy);
        control_points.push(ControlPoint::new(x as f32, y as f32, on_curve));
    }
    Ok(GlyphVector {
        control_points,
        end_points,
        ..Default::default()
    })
}

/// Applies the explicit bounding boxes and computes the remaining ones.
fn read_bounds(bbox: &mut Cursor, slots: &mut [Slot]) -> Result<(), ReadError> {
    let bitmap_len = slots.len().div_ceil(32) * 4;
    let bitmap = bbox.read_bytes(bitmap_len)?;
    for (ix, slot) in slots.iter_mut().enumerate() {
        let has_bbox = bitmap[ix >> 3] & (0x80 >> (ix & 7)) != 0;
        let explicit = if has_bbox {
            Some(Bounds::new(
                bbox.read_i16()? as f32,
                bbox.read_i16()? as f32,
                bbox.read_i16()? as f32,
                bbox.read_i16()? as f32,
            ))
        } else {
            None
        };
        match slot {
            Slot::Simple(glyph) => {
                glyph.bounds = explicit.unwrap_or_else(|| {
                    Bounds::from_points(glyph.control_points.iter().map(|p| p.position))
                });
            }
            Slot::Composite(composite) => {
                composite.bounds = explicit.ok_or(ReadError::MalformedData(
                    "composite glyph without explicit bounds",
                ))?;
            }
            _ if explicit.is_some() => {
                return Err(ReadError::MalformedData("empty glyph with explicit bounds"))
            }
            _ => {}
        }
    }
    Ok(())
}

struct CompositeResolver {
    slots: Vec<Slot>,
}

impl CompositeResolver {
    /// Resolves a glyph reached through `depth` composite levels, returning
    /// it with its nesting height.
    ///
    /// Only finished glyphs are stored. A composite that fails, whether by
    /// its own fault or because the path that reached it was already too
    /// deep, goes back to its unresolved state so that its own verdict is
    /// decided by its own height.
    fn resolve(
        &mut self,
        gid: GlyphId,
        depth: usize,
    ) -> Result<(Arc<GlyphVector>, usize), ReadError> {
        if depth > MAX_COMPOSITE_DEPTH {
            return Err(ReadError::CompositeDepthExceeded(gid));
        }
        let ix = gid.to_u32() as usize;
        let slot = self
            .slots
            .get_mut(ix)
            .ok_or(ReadError::GlyphOutOfRange(gid))?;
        let (glyph, height) = match std::mem::replace(slot, Slot::InProgress) {
            Slot::Empty => (Arc::new(GlyphVector::empty()), 0),
            Slot::Simple(glyph) => (Arc::new(glyph), 0),
            Slot::Done(glyph, height) => (glyph, height),
            // reentering a glyph under resolution is a cycle
            Slot::InProgress => return Err(ReadError::CompositeDepthExceeded(gid)),
            Slot::Composite(composite) => {
                let mut height = 0;
                let resolved = composite.resolve(|component| {
                    let (glyph, component_height) = self.resolve(component, depth + 1)?;
                    height = height.max(component_height + 1);
                    Ok(glyph)
                });
                match resolved {
                    Ok(glyph) => (Arc::new(glyph), height),
                    Err(err) => {
                        self.slots[ix] = Slot::Composite(composite);
                        return Err(err);
                    }
                }
            }
        };
        self.slots[ix] = Slot::Done(glyph.clone(), height);
        if depth + height > MAX_COMPOSITE_DEPTH {
            return Err(ReadError::CompositeDepthExceeded(gid));
        }
        Ok((glyph, height))
    }
}
