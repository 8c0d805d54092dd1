// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shapes and scene setup shared across tests.

use glyph_sdf::color::Rgba8;
use glyph_sdf::kurbo::{Affine, BezPath, Circle, Point, Shape};
use glyph_sdf::{
    CompositeMode, ControlPoint, GlyphCurveStore, GlyphCurves, GlyphInstance, Pixmap,
    Rasterizer, RenderSettings, ScreenTransform,
};

pub(crate) const INK: Rgba8 = Rgba8 {
    r: 20,
    g: 20,
    b: 30,
    a: 255,
};

pub(crate) const PAPER: Rgba8 = Rgba8 {
    r: 250,
    g: 245,
    b: 235,
    a: 255,
};

pub(crate) fn pt(x: f32, y: f32) -> ControlPoint {
    ControlPoint::new(x, y)
}

/// A regular polygon inscribed in the circle of radius `radius` around `(0.5, 0.5)`,
/// wound counter-clockwise.
pub(crate) fn regular_polygon(sides: usize, radius: f32) -> Vec<ControlPoint> {
    (0..sides)
        .map(|i| {
            let angle = i as f32 / sides as f32 * core::f32::consts::TAU;
            pt(0.5 + radius * angle.cos(), 0.5 + radius * angle.sin())
        })
        .collect()
}

/// Appends a closed polygon as line segments.
pub(crate) fn push_polygon(store: &mut GlyphCurveStore, points: &[ControlPoint]) -> GlyphCurves {
    let mut builder = store.begin_glyph();
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        builder.push_line(a, b).unwrap();
    }
    builder.finish()
}

/// Signed distance from `p` to the boundary of a convex counter-clockwise polygon,
/// computed from its half-planes. Exact inside; a lower bound of the magnitude outside.
pub(crate) fn half_plane_distance(points: &[ControlPoint], p: ControlPoint) -> f32 {
    (0..points.len())
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            let (ex, ey) = (b.x - a.x, b.y - a.y);
            let len = (ex * ex + ey * ey).sqrt();
            // Positive on the right of travel, which is outside.
            (ex * (a.y - p.y) - ey * (a.x - p.x)) / len
        })
        .fold(f32::NEG_INFINITY, f32::max)
}

/// A counter-clockwise disc as a kurbo path made of cubics.
pub(crate) fn disc_path(center: (f64, f64), radius: f64) -> BezPath {
    Circle::new(Point::new(center.0, center.1), radius)
        .path_elements(1e-4)
        .collect()
}

/// Appends `path` in shape space coordinates.
pub(crate) fn push_path(store: &mut GlyphCurveStore, path: &BezPath) -> GlyphCurves {
    let mut builder = store.begin_glyph();
    builder.push_path(path, Affine::IDENTITY).unwrap();
    builder.finish()
}

/// An instance filling a `size` pixel square with its bottom left corner at `origin`.
pub(crate) fn square_instance(curves: GlyphCurves, origin: [f32; 2], size: f32) -> GlyphInstance {
    GlyphInstance::new(origin, [size, size], INK, PAPER, curves)
}

pub(crate) fn rasterizer(mode: CompositeMode, num_threads: u16) -> Rasterizer {
    Rasterizer::new(RenderSettings { mode, num_threads }).unwrap()
}

/// Renders `instances` on a pixel-unit viewport.
pub(crate) fn render(
    rasterizer: &Rasterizer,
    store: &GlyphCurveStore,
    instances: &[GlyphInstance],
    width: u16,
    height: u16,
) -> Pixmap {
    rasterizer
        .render_to_pixmap(
            store,
            instances,
            &ScreenTransform::pixels(width, height),
            width,
            height,
        )
        .unwrap()
}

/// Every ordering of `items`.
pub(crate) fn permutations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let first = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first);
            out.push(tail);
        }
    }
    out
}

/// Query points on a `steps` by `steps` grid over `[lo, hi]²`, at cell centers.
pub(crate) fn grid(steps: u32, lo: f32, hi: f32) -> impl Iterator<Item = ControlPoint> {
    let cell = (hi - lo) / steps as f32;
    (0..steps).flat_map(move |j| {
        (0..steps).map(move |i| pt(lo + (i as f32 + 0.5) * cell, lo + (j as f32 + 0.5) * cell))
    })
}
