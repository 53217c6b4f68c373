//! Lazy, cached access to the outlines of every glyph in a font.

use std::sync::{Arc, OnceLock};

use font_types::GlyphId;

use crate::{
    composite::CompositeGlyph,
    glyf::{decode_simple_glyph, glyph_kind, GlyphKind},
    tables::glyf::TAG as GLYF,
    GlyphVector, ReadError, TableProvider, MAX_COMPOSITE_DEPTH,
};

/// A deferred recipe for constructing one glyph.
#[derive(Clone, Debug)]
pub enum GlyphLoader<'a> {
    /// An unparsed simple glyph record.
    Simple(&'a [u8]),
    /// An unparsed composite glyph record.
    Composite(&'a [u8]),
    Empty,
    /// A glyph already decoded from a transformed WOFF2 `glyf` table.
    Woff2Transformed(Arc<GlyphVector>),
}

impl<'a> GlyphLoader<'a> {
    fn new(record: &'a [u8]) -> Self {
        // Records too short to classify are left to fail when decoded
        match glyph_kind(record) {
            Ok(GlyphKind::Empty) => GlyphLoader::Empty,
            Ok(GlyphKind::Composite) => GlyphLoader::Composite(record),
            Ok(GlyphKind::Simple) | Err(_) => GlyphLoader::Simple(record),
        }
    }

    /// Builds the glyph, resolving composite components through `table`.
    ///
    /// Returns the glyph with its nesting height: zero for anything but a
    /// composite, otherwise one more than its tallest component.
    pub fn create_glyph(
        &self,
        table: &GlyphTable<'a>,
        depth: usize,
    ) -> Result<(Arc<GlyphVector>, usize), ReadError> {
        match self {
            GlyphLoader::Simple(data) => Ok((Arc::new(decode_simple_glyph(data)?), 0)),
            GlyphLoader::Composite(data) => {
                let mut height = 0;
                let glyph = CompositeGlyph::read(data)?.resolve(|component| {
                    let (glyph, component_height) = table.get_with_depth(component, depth + 1)?;
                    height = height.max(component_height + 1);
                    Ok(glyph)
                })?;
                Ok((Arc::new(glyph), height))
            }
            GlyphLoader::Empty => Ok((Arc::new(GlyphVector::empty()), 0)),
            GlyphLoader::Woff2Transformed(glyph) => Ok((glyph.clone(), 0)),
        }
    }
}

/// Every glyph of a font, decoded on first access and cached.
///
/// The cache may be shared across threads; each glyph is stored at most
/// once and every caller receives the same instance.
#[derive(Debug)]
pub struct GlyphTable<'a> {
    loaders: Vec<GlyphLoader<'a>>,
    // each glyph with its nesting height
    cache: Vec<OnceLock<(Arc<GlyphVector>, usize)>>,
}

impl<'a> GlyphTable<'a> {
    /// Builds loaders for each glyph from the `glyf` and `loca` tables.
    ///
    /// Fails if `loca` is not ascending or points past the end of `glyf`.
    pub fn new(provider: &'a impl TableProvider) -> Result<Self, ReadError> {
        let loca = provider.loca()?;
        let glyf = provider.expect_table_data(GLYF)?;
        let loaders = (0..loca.len())
            .map(|ix| {
                let range = loca.glyph_range(GlyphId::new(ix as u32))?;
                glyf.as_bytes()
                    .get(range)
                    .map(GlyphLoader::new)
                    .ok_or(ReadError::MalformedData("loca offset past the end of glyf"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_loaders(loaders))
    }

    /// Wraps glyphs that were decoded in a single batch.
    pub fn from_decoded(glyphs: Vec<Arc<GlyphVector>>) -> Self {
        Self::with_loaders(
            glyphs
                .into_iter()
                .map(GlyphLoader::Woff2Transformed)
                .collect(),
        )
    }

    fn with_loaders(loaders: Vec<GlyphLoader<'a>>) -> Self {
        let cache = loaders.iter().map(|_| OnceLock::new()).collect();
        Self { loaders, cache }
    }

    /// The number of glyphs in the table.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    pub fn loader(&self, glyph_id: GlyphId) -> Option<&GlyphLoader<'a>> {
        self.loaders.get(glyph_id.to_u32() as usize)
    }

    /// Returns the outline for `glyph_id`.
    ///
    /// Glyphs that are out of range or fail to decode are returned as an
    /// empty glyph.
    pub fn get_glyph(&self, glyph_id: GlyphId) -> Arc<GlyphVector> {
        self.try_get_glyph(glyph_id).unwrap_or_else(|err| {
            log::warn!("substituting empty outline for glyph {glyph_id}: {err}");
            Arc::new(GlyphVector::empty())
        })
    }

    /// Returns the outline for `glyph_id`, or the error that prevented it
    /// from being decoded.
    ///
    /// Failures are not cached.
    pub fn try_get_glyph(&self, glyph_id: GlyphId) -> Result<Arc<GlyphVector>, ReadError> {
        self.get_with_depth(glyph_id, 0).map(|(glyph, _)| glyph)
    }

    /// Loads a glyph reached through `depth` composite levels.
    ///
    /// The verdict for a glyph depends only on its own nesting height, so
    /// it does not change with the order in which glyphs are requested.
    /// The depth guard stops reference cycles; a glyph whose load was cut
    /// short by it is not cached and is retried from its own root later.
    fn get_with_depth(
        &self,
        glyph_id: GlyphId,
        depth: usize,
    ) -> Result<(Arc<GlyphVector>, usize), ReadError> {
        if depth > MAX_COMPOSITE_DEPTH {
            return Err(ReadError::CompositeDepthExceeded(glyph_id));
        }
        let ix = glyph_id.to_u32() as usize;
        let (loader, slot) = self
            .loaders
            .get(ix)
            .zip(self.cache.get(ix))
            .ok_or(ReadError::GlyphOutOfRange(glyph_id))?;
        let (glyph, height) = match slot.get() {
            Some(cached) => cached.clone(),
            None => {
                let loaded = loader.create_glyph(self, depth)?;
                // Another thread may have won the race; hand out its copy
                slot.get_or_init(|| loaded).clone()
            }
        };
        if depth + height > MAX_COMPOSITE_DEPTH {
            return Err(ReadError::CompositeDepthExceeded(glyph_id));
        }
        Ok((glyph, height))
    }
}
