// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat, append-only curve buffers shared by all glyphs of a draw batch.
//!
//! Control points are stored per curve degree: lines take two points per segment and
//! quadratics take three. A glyph addresses its segments with one [`CurveRange`] per
//! degree, counted in curves rather than points. The cubic buffer keeps its slot in the
//! layout but is never populated; cubic input is flattened into quadratics on append.
//!
//! The store behaves like an arena: ranges are non-owning views, nothing is ever removed
//! piecemeal, and [`GlyphCurveStore::clear`] invalidates every range at once.

use alloc::vec::Vec;

use crate::aggregate::MAX_QUADRATIC_SEGMENTS;
use crate::instance::GlyphInstance;
use crate::kurbo::{Affine, BezPath, CubicBez, PathEl, Point};
use crate::math::ControlPoint;
use crate::Error;

/// Number of control points per line segment.
pub const LINE_POINTS: usize = 2;
/// Number of control points per quadratic segment.
pub const QUADRATIC_POINTS: usize = 3;
/// Number of control points per cubic segment. The cubic buffer is reserved and unused.
pub const CUBIC_POINTS: usize = 4;

/// Default accuracy, in shape space units, for flattening cubics into quadratics.
pub const DEFAULT_CUBIC_TOLERANCE: f64 = 1e-3;

/// A line segment from `[0]` to `[1]`.
pub type LineSegment = [ControlPoint; LINE_POINTS];
/// A quadratic segment with endpoints `[0]`, `[2]` and control point `[1]`.
pub type QuadraticSegment = [ControlPoint; QUADRATIC_POINTS];

/// A contiguous run of curves in one curve buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CurveRange {
    /// Index of the first curve.
    pub offset: u32,
    /// Number of curves.
    pub count: u32,
}

impl CurveRange {
    /// A range addressing no curves.
    pub const EMPTY: Self = Self::new(0, 0);

    /// Creates a new range.
    pub const fn new(offset: u32, count: u32) -> Self {
        Self { offset, count }
    }

    /// Whether the range addresses no curves.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Index one past the last curve, widened so it cannot overflow.
    pub const fn end(&self) -> u64 {
        self.offset as u64 + self.count as u64
    }

    /// Resolves the range against a buffer holding `len` curves of `points_per_curve`
    /// points, returning the index range into the point buffer.
    fn point_range(
        &self,
        len: u32,
        points_per_curve: usize,
    ) -> Result<core::ops::Range<usize>, Error> {
        if self.end() > u64::from(len) {
            return Err(Error::range_out_of_bounds(*self, len));
        }
        let start = self.offset as usize * points_per_curve;
        Ok(start..start + self.count as usize * points_per_curve)
    }
}

/// The ranges assigned to one glyph, one per curve degree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GlyphCurves {
    /// The glyph's line segments.
    pub lines: CurveRange,
    /// The glyph's quadratic segments.
    pub quadratics: CurveRange,
    /// Reserved for cubic segments. Always empty.
    pub cubics: CurveRange,
}

/// The resolved segments of one glyph instance.
///
/// Obtained from [`GlyphCurveStore::segments`], which validates the ranges once so that
/// per-pixel evaluation can index without further checks.
#[derive(Copy, Clone, Debug)]
pub struct GlyphSegments<'a> {
    /// Every line segment of the glyph.
    pub lines: &'a [LineSegment],
    /// Every quadratic segment of the glyph.
    ///
    /// Empty when the instance's quadratic range is over the safety cap.
    pub quadratics: &'a [QuadraticSegment],
    /// The length of the instance's quadratic range, as requested.
    pub quadratic_range_len: u32,
}

impl GlyphSegments<'_> {
    /// Whether the quadratic range trips the safety cap.
    pub fn exceeds_quadratic_cap(&self) -> bool {
        self.quadratic_range_len as usize > MAX_QUADRATIC_SEGMENTS
    }
}

/// Append-only control-point buffers for lines, quadratics and (reserved) cubics.
#[derive(Clone, Debug)]
pub struct GlyphCurveStore {
    lines: Vec<ControlPoint>,
    quadratics: Vec<ControlPoint>,
    cubics: Vec<ControlPoint>,
    cubic_tolerance: f64,
}

impl Default for GlyphCurveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphCurveStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            quadratics: Vec::new(),
            cubics: Vec::new(),
            cubic_tolerance: DEFAULT_CUBIC_TOLERANCE,
        }
    }

    /// Sets the accuracy used when flattening cubic input into quadratics.
    pub fn with_cubic_tolerance(mut self, tolerance: f64) -> Self {
        self.cubic_tolerance = tolerance.max(1e-6);
        self
    }

    /// Starts appending the outline of one glyph.
    ///
    /// All segments pushed through the builder land contiguously, so the glyph is
    /// described by a single range per degree.
    pub fn begin_glyph(&mut self) -> GlyphBuilder<'_> {
        GlyphBuilder {
            line_start: self.line_count(),
            quadratic_start: self.quadratic_count(),
            store: self,
        }
    }

    /// Number of line segments stored.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "appends are rejected once a buffer reaches u32::MAX curves"
    )]
    pub fn line_count(&self) -> u32 {
        (self.lines.len() / LINE_POINTS) as u32
    }

    /// Number of quadratic segments stored.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "appends are rejected once a buffer reaches u32::MAX curves"
    )]
    pub fn quadratic_count(&self) -> u32 {
        (self.quadratics.len() / QUADRATIC_POINTS) as u32
    }

    /// Number of cubic segments stored. Always zero.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "appends are rejected once a buffer reaches u32::MAX curves"
    )]
    pub fn cubic_count(&self) -> u32 {
        (self.cubics.len() / CUBIC_POINTS) as u32
    }

    /// Whether no curves have been stored.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.quadratics.is_empty()
    }

    /// The flattened line buffer, two points per segment.
    pub fn line_points(&self) -> &[ControlPoint] {
        &self.lines
    }

    /// The flattened quadratic buffer, three points per segment.
    pub fn quadratic_points(&self) -> &[ControlPoint] {
        &self.quadratics
    }

    /// The flattened cubic buffer, four points per segment.
    pub fn cubic_points(&self) -> &[ControlPoint] {
        &self.cubics
    }

    /// The line buffer as bytes, ready for upload.
    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }

    /// The quadratic buffer as bytes, ready for upload.
    pub fn quadratic_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.quadratics)
    }

    /// The cubic buffer as bytes, ready for upload.
    pub fn cubic_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cubics)
    }

    /// Looks up the segments referenced by `instance`.
    ///
    /// The line and quadratic ranges are checked against the buffers here, once. A
    /// quadratic range longer than [`MAX_QUADRATIC_SEGMENTS`] is not resolved at all: the
    /// returned segments report the overflow and carry no curves, whatever the buffer
    /// holds.
    pub fn segments(&self, instance: &GlyphInstance) -> Result<GlyphSegments<'_>, Error> {
        let lines = instance.lines.point_range(self.line_count(), LINE_POINTS)?;
        let quadratic_range_len = instance.quadratics.count;
        let quadratics = if quadratic_range_len as usize > MAX_QUADRATIC_SEGMENTS {
            &[][..]
        } else {
            let range = instance
                .quadratics
                .point_range(self.quadratic_count(), QUADRATIC_POINTS)?;
            bytemuck::cast_slice(&self.quadratics[range])
        };
        Ok(GlyphSegments {
            lines: bytemuck::cast_slice(&self.lines[lines]),
            quadratics,
            quadratic_range_len,
        })
    }

    /// Drops every curve, invalidating all previously returned ranges.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.quadratics.clear();
        self.cubics.clear();
    }
}

/// Appends the segments of one glyph to a [`GlyphCurveStore`].
#[derive(Debug)]
#[must_use = "Call `finish` to obtain the glyph's curve ranges."]
pub struct GlyphBuilder<'a> {
    store: &'a mut GlyphCurveStore,
    line_start: u32,
    quadratic_start: u32,
}

impl GlyphBuilder<'_> {
    /// Appends a line segment from `a` to `b`.
    pub fn push_line(&mut self, a: ControlPoint, b: ControlPoint) -> Result<(), Error> {
        if self.store.line_count() == u32::MAX {
            return Err(Error::capacity_overflow());
        }
        self.store.lines.extend_from_slice(&[a, b]);
        Ok(())
    }

    /// Appends a quadratic segment from `a` to `c` with control point `b`.
    pub fn push_quadratic(
        &mut self,
        a: ControlPoint,
        b: ControlPoint,
        c: ControlPoint,
    ) -> Result<(), Error> {
        if self.store.quadratic_count() == u32::MAX {
            return Err(Error::capacity_overflow());
        }
        self.store.quadratics.extend_from_slice(&[a, b, c]);
        Ok(())
    }

    /// Appends a cubic segment, flattened into quadratics within the store's tolerance.
    pub fn push_cubic(
        &mut self,
        a: ControlPoint,
        b: ControlPoint,
        c: ControlPoint,
        d: ControlPoint,
    ) -> Result<(), Error> {
        let cubic = CubicBez::new(a.to_kurbo(), b.to_kurbo(), c.to_kurbo(), d.to_kurbo());
        for (_, _, quad) in cubic.to_quads(self.store.cubic_tolerance) {
            self.push_quadratic(
                ControlPoint::from_kurbo(quad.p0),
                ControlPoint::from_kurbo(quad.p1),
                ControlPoint::from_kurbo(quad.p2),
            )?;
        }
        Ok(())
    }

    /// Appends every segment of `path`, mapped through `transform` into shape space.
    ///
    /// Sub-paths that are left open are closed with a line back to their start point.
    pub fn push_path(&mut self, path: &BezPath, transform: Affine) -> Result<(), Error> {
        let mut start: Option<Point> = None;
        let mut current = Point::ZERO;
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    self.close_contour(start, current, false)?;
                    let p = transform * p;
                    start = Some(p);
                    current = p;
                }
                PathEl::LineTo(p) => {
                    let p = transform * p;
                    self.push_line(
                        ControlPoint::from_kurbo(current),
                        ControlPoint::from_kurbo(p),
                    )?;
                    current = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    let (p1, p2) = (transform * p1, transform * p2);
                    self.push_quadratic(
                        ControlPoint::from_kurbo(current),
                        ControlPoint::from_kurbo(p1),
                        ControlPoint::from_kurbo(p2),
                    )?;
                    current = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    let (p1, p2, p3) = (transform * p1, transform * p2, transform * p3);
                    self.push_cubic(
                        ControlPoint::from_kurbo(current),
                        ControlPoint::from_kurbo(p1),
                        ControlPoint::from_kurbo(p2),
                        ControlPoint::from_kurbo(p3),
                    )?;
                    current = p3;
                }
                PathEl::ClosePath => {
                    self.close_contour(start, current, true)?;
                    if let Some(start) = start {
                        current = start;
                    }
                }
            }
        }
        self.close_contour(start, current, false)
    }

    fn close_contour(
        &mut self,
        start: Option<Point>,
        current: Point,
        explicit: bool,
    ) -> Result<(), Error> {
        let Some(start) = start else {
            return Ok(());
        };
        if (current - start).hypot2() <= f64::EPSILON {
            return Ok(());
        }
        if !explicit {
            log::trace!("closing open contour from {current:?} to {start:?}");
        }
        self.push_line(
            ControlPoint::from_kurbo(current),
            ControlPoint::from_kurbo(start),
        )
    }

    /// Finishes the glyph and returns the ranges covering everything pushed.
    pub fn finish(self) -> GlyphCurves {
        GlyphCurves {
            lines: CurveRange::new(self.line_start, self.store.line_count() - self.line_start),
            quadratics: CurveRange::new(
                self.quadratic_start,
                self.store.quadratic_count() - self.quadratic_start,
            ),
            cubics: CurveRange::EMPTY,
        }
    }
}
