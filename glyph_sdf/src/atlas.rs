// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A glyph-keyed cache of outlines over one [`GlyphCurveStore`].

use hashbrown::HashMap;

use crate::composite::BLEND_SHARPNESS;
use crate::kurbo::{
    Affine, BezPath, CubicBez, Line, ParamCurveArea, PathEl, Point, QuadBez, Rect, Shape, Vec2,
};
use crate::store::{GlyphBuilder, GlyphCurveStore, GlyphCurves};
use crate::Error;

/// Fraction of the quad left empty on each side of the outline, so the blend ramp
/// outside the outline is not cut off by the quad edge.
pub const EDGE_MARGIN: f64 = 1.0 / BLEND_SHARPNESS as f64;

/// Identifies one glyph of one font.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// Caller-chosen identifier of the font.
    pub font_id: u64,
    /// Glyph index within the font.
    pub glyph_id: u32,
}

impl GlyphKey {
    /// Creates a new key.
    pub const fn new(font_id: u64, glyph_id: u32) -> Self {
        Self { font_id, glyph_id }
    }
}

/// Placement of a glyph's quad relative to its pen position, in em units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Bottom left corner of the quad.
    pub offset: [f32; 2],
    /// Size of the quad. Both axes are equal for outlines inserted through
    /// [`CurveAtlas::insert_path`], which keeps shape space isotropic.
    pub extent: [f32; 2],
    /// Horizontal advance to the next pen position.
    pub advance: f32,
}

/// A cached glyph.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphEntry {
    /// The glyph's ranges in the atlas store.
    pub curves: GlyphCurves,
    /// Where the glyph's quad goes.
    pub metrics: GlyphMetrics,
}

/// Owns a curve store and remembers which ranges hold which glyph.
///
/// Entries never change once inserted. Changing fonts means [`clear`](Self::clear)ing
/// the atlas and rebuilding, which invalidates every range handed out before.
#[derive(Clone, Debug, Default)]
pub struct CurveAtlas {
    store: GlyphCurveStore,
    entries: HashMap<GlyphKey, GlyphEntry>,
    cache_hits: u64,
    cache_misses: u64,
}

impl CurveAtlas {
    /// Creates an empty atlas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty atlas appending to `store`.
    ///
    /// The store is cleared first, since ranges already in it would not be known to
    /// the atlas.
    pub fn with_store(mut store: GlyphCurveStore) -> Self {
        store.clear();
        Self {
            store,
            ..Self::default()
        }
    }

    /// The store holding every cached glyph's curves.
    pub fn store(&self) -> &GlyphCurveStore {
        &self.store
    }

    /// Looks up a cached glyph.
    pub fn get(&self, key: &GlyphKey) -> Option<&GlyphEntry> {
        self.entries.get(key)
    }

    /// Returns the cached glyph for `key`, building it with `build` on a miss.
    ///
    /// `build` appends the glyph's segments through the builder and returns its
    /// metrics. If it fails, the entry is not cached; curves it already appended stay in
    /// the store unreferenced until the next [`clear`](Self::clear).
    pub fn get_or_insert_with<F>(&mut self, key: GlyphKey, build: F) -> Result<GlyphEntry, Error>
    where
        F: FnOnce(&mut GlyphBuilder<'_>) -> Result<GlyphMetrics, Error>,
    {
        if let Some(entry) = self.entries.get(&key) {
            self.cache_hits += 1;
            return Ok(*entry);
        }
        self.cache_misses += 1;
        log::trace!("building glyph {} of font {}", key.glyph_id, key.font_id);
        let mut builder = self.store.begin_glyph();
        let metrics = build(&mut builder)?;
        let entry = GlyphEntry {
            curves: builder.finish(),
            metrics,
        };
        self.entries.insert(key, entry);
        Ok(entry)
    }

    /// Caches an outline given in font units, fitting it into shape space.
    ///
    /// The outline's bounding box is scaled uniformly so its longer side spans the unit
    /// quad minus [`EDGE_MARGIN`] on each side, and the returned metrics place the quad
    /// back where the outline was. Outlines whose total signed area is negative, such as
    /// TrueType glyphs, are reversed so the filled side evaluates as inside. Paths without
    /// segments, such as a space, produce an entry with no curves and an empty quad.
    pub fn insert_path(
        &mut self,
        key: GlyphKey,
        path: &BezPath,
        advance: f32,
        units_per_em: f32,
    ) -> Result<GlyphEntry, Error> {
        self.get_or_insert_with(key, |builder| {
            let outline = Outline {
                path,
                bounds: path.bounding_box(),
                area: closed_area(path),
            };
            push_fitted(builder, &outline, advance, units_per_em)
        })
    }

    /// Number of cached glyphs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no glyphs are cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache since the last [`clear_stats`](Self::clear_stats).
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// Lookups that built a glyph since the last [`clear_stats`](Self::clear_stats).
    pub fn cache_misses(&self) -> u64 {
        self.cache_misses
    }

    /// Resets the hit and miss counters.
    pub fn clear_stats(&mut self) {
        self.cache_hits = 0;
        self.cache_misses = 0;
    }

    /// Drops every glyph and curve.
    pub fn clear(&mut self) {
        log::debug!("clearing curve atlas with {} glyphs", self.entries.len());
        self.store.clear();
        self.entries.clear();
        self.clear_stats();
    }
}

/// An outline in font units with its precomputed bounds and signed area.
pub(crate) struct Outline<'a> {
    pub(crate) path: &'a BezPath,
    pub(crate) bounds: Rect,
    /// Positive when the outline winds counter-clockwise, y up.
    pub(crate) area: f64,
}

/// Appends `outline` counter-clockwise and fitted to the unit quad, returning where
/// the quad goes.
pub(crate) fn push_fitted(
    builder: &mut GlyphBuilder<'_>,
    outline: &Outline<'_>,
    advance: f32,
    units_per_em: f32,
) -> Result<GlyphMetrics, Error> {
    let em = f64::from(units_per_em);
    let advance = if em > 0.0 { advance / units_per_em } else { 0.0 };
    let Some(fit) = Fit::new(outline.path, outline.bounds) else {
        return Ok(GlyphMetrics {
            advance,
            ..GlyphMetrics::default()
        });
    };
    if outline.area < 0.0 {
        let reversed = outline.path.reverse_subpaths();
        builder.push_path(&reversed, fit.transform)?;
    } else {
        builder.push_path(outline.path, fit.transform)?;
    }
    Ok(fit.metrics(em, advance))
}

/// Signed area of `path` with every sub-path closed, as
/// [`GlyphBuilder::push_path`] closes them.
fn closed_area(path: &BezPath) -> f64 {
    let mut area = 0.0;
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                area += Line::new(current, start).signed_area();
                start = p;
                current = p;
            }
            PathEl::LineTo(p) => {
                area += Line::new(current, p).signed_area();
                current = p;
            }
            PathEl::QuadTo(p1, p2) => {
                area += QuadBez::new(current, p1, p2).signed_area();
                current = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                area += CubicBez::new(current, p1, p2, p3).signed_area();
                current = p3;
            }
            PathEl::ClosePath => {
                area += Line::new(current, start).signed_area();
                current = start;
            }
        }
    }
    area + Line::new(current, start).signed_area()
}

/// The square in font units that maps onto the unit quad.
struct Fit {
    origin: Vec2,
    side: f64,
    transform: Affine,
}

impl Fit {
    fn new(path: &BezPath, bounds: Rect) -> Option<Self> {
        if path.segments().next().is_none() {
            return None;
        }
        let longest = bounds.width().max(bounds.height());
        if !(longest > 0.0 && longest.is_finite()) {
            return None;
        }
        let side = longest / (1.0 - 2.0 * EDGE_MARGIN);
        let origin = Vec2::new(bounds.x0, bounds.y0) - Vec2::new(side, side) * EDGE_MARGIN;
        let transform = Affine::scale(1.0 / side) * Affine::translate(-origin);
        Some(Self {
            origin,
            side,
            transform,
        })
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "em-relative metrics are stored at f32 precision"
    )]
    fn metrics(&self, em: f64, advance: f32) -> GlyphMetrics {
        if !(em > 0.0) {
            return GlyphMetrics {
                advance,
                ..GlyphMetrics::default()
            };
        }
        let side = (self.side / em) as f32;
        GlyphMetrics {
            offset: [(self.origin.x / em) as f32, (self.origin.y / em) as f32],
            extent: [side, side],
            advance,
        }
    }
}
