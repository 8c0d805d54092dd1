// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading glyph outlines from fonts with skrifa.

use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlineGlyph, OutlinePen};

use crate::atlas::{push_fitted, CurveAtlas, GlyphEntry, GlyphKey, Outline};
use crate::kurbo::{BezPath, CubicBez, Line, ParamCurveArea, Point, QuadBez, Rect};
use crate::Error;

/// Records a glyph outline as a kurbo path while measuring its winding.
///
/// Font outlines are y-up, like shape space, so coordinates are recorded as given.
/// TrueType contours wind clockwise and CFF contours counter-clockwise; the signed area
/// tells the two apart so the atlas can store every glyph counter-clockwise.
#[derive(Clone, Debug)]
pub struct OutlinePath {
    /// The recorded outline.
    pub path: BezPath,
    /// Bounds of every on- and off-curve point.
    pub bbox: Rect,
    area: f64,
    start: Point,
    current: Point,
}

impl Default for OutlinePath {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlinePath {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            path: BezPath::new(),
            bbox: EMPTY_BOUNDS,
            area: 0.0,
            start: Point::ZERO,
            current: Point::ZERO,
        }
    }

    /// Signed area enclosed so far, counting an unfinished contour as closed.
    ///
    /// Positive for counter-clockwise outlines.
    pub fn signed_area(&self) -> f64 {
        self.area + Line::new(self.current, self.start).signed_area()
    }

    /// Whether the outline as a whole winds clockwise.
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    fn outline(&self) -> Outline<'_> {
        Outline {
            path: &self.path,
            bounds: self.bbox,
            area: self.signed_area(),
        }
    }

    fn advance(&mut self, to: Point, area: f64) {
        self.area += area;
        self.current = to;
        self.bbox = self.bbox.union_pt(to);
    }
}

const EMPTY_BOUNDS: Rect = Rect {
    x0: f64::INFINITY,
    y0: f64::INFINITY,
    x1: f64::NEG_INFINITY,
    y1: f64::NEG_INFINITY,
};

fn point(x: f32, y: f32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

impl OutlinePen for OutlinePath {
    fn move_to(&mut self, x: f32, y: f32) {
        let to = point(x, y);
        self.path.move_to(to);
        // Contours skrifa leaves open are closed when appended.
        let closing = Line::new(self.current, self.start).signed_area();
        self.start = to;
        self.advance(to, closing);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let to = point(x, y);
        self.path.line_to(to);
        self.advance(to, Line::new(self.current, to).signed_area());
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let (c, to) = (point(cx, cy), point(x, y));
        self.path.quad_to(c, to);
        self.bbox = self.bbox.union_pt(c);
        self.advance(to, QuadBez::new(self.current, c, to).signed_area());
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1, to) = (point(cx0, cy0), point(cx1, cy1), point(x, y));
        self.path.curve_to(c0, c1, to);
        self.bbox = self.bbox.union_pt(c0).union_pt(c1);
        self.advance(to, CubicBez::new(self.current, c0, c1, to).signed_area());
    }

    fn close(&mut self) {
        self.path.close_path();
        self.area += Line::new(self.current, self.start).signed_area();
        self.current = self.start;
    }
}

impl CurveAtlas {
    /// Caches a font glyph, drawn unhinted in font units at the default location.
    ///
    /// `advance` and `units_per_em` come from the font's metrics and are used as in
    /// [`insert_path`](Self::insert_path). Clockwise outlines are reversed.
    pub fn insert_outline(
        &mut self,
        key: GlyphKey,
        glyph: &OutlineGlyph<'_>,
        advance: f32,
        units_per_em: f32,
    ) -> Result<GlyphEntry, Error> {
        self.get_or_insert_with(key, |builder| {
            let mut pen = OutlinePath::new();
            let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
            glyph.draw(settings, &mut pen).map_err(|err| {
                log::warn!("failed to draw glyph {}: {err}", key.glyph_id);
                Error::outline()
            })?;
            push_fitted(builder, &pen.outline(), advance, units_per_em)
        })
    }
}
