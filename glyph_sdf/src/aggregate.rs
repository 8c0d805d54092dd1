// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reduces the per-segment distances of one glyph to a single signed distance.

use crate::ControlPoint;
use crate::distance::{SegmentDistance, line_distance, quadratic_distance};
use crate::store::GlyphSegments;

/// Distances closer than this are considered equal and resolved by orthogonality.
pub const TIE_EPSILON: f32 = 1e-4;

/// Quadratic ranges longer than this are not evaluated.
///
/// Such glyphs are drawn in [`DIAGNOSTIC_GRAY`](crate::composite::DIAGNOSTIC_GRAY)
/// instead, bounding the work done per pixel.
pub const MAX_QUADRATIC_SEGMENTS: usize = 500;

/// The outcome of aggregating one glyph at one point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Aggregate {
    /// The winning segment's distance.
    Distance(SegmentDistance),
    /// The quadratic range was over [`MAX_QUADRATIC_SEGMENTS`]; nothing was evaluated.
    Overflow,
}

impl Aggregate {
    /// The signed distance, if the glyph was evaluated.
    pub fn signed_distance(&self) -> Option<f32> {
        match self {
            Self::Distance(d) => Some(d.signed_distance),
            Self::Overflow => None,
        }
    }
}

/// Whether `candidate` should replace `best` in the reduction.
///
/// Within [`TIE_EPSILON`] the larger absolute orthogonality wins. Exact orthogonality
/// ties fall through to the smaller absolute distance, then the smaller signed distance,
/// which keeps the winner independent of visiting order.
#[inline]
pub fn prefer(candidate: &SegmentDistance, best: &SegmentDistance) -> bool {
    let (cd, bd) = (candidate.distance(), best.distance());
    if (cd - bd).abs() < TIE_EPSILON {
        let (co, bo) = (candidate.orthogonality.abs(), best.orthogonality.abs());
        if co != bo {
            return co > bo;
        }
        if cd != bd {
            return cd < bd;
        }
        candidate.signed_distance < best.signed_distance
    } else {
        cd < bd
    }
}

/// Folds a sequence of segment distances into the preferred one.
///
/// An empty sequence yields [`SegmentDistance::FARTHEST`].
pub fn reduce(distances: impl IntoIterator<Item = SegmentDistance>) -> SegmentDistance {
    distances
        .into_iter()
        .fold(SegmentDistance::FARTHEST, |best, candidate| {
            if prefer(&candidate, &best) {
                candidate
            } else {
                best
            }
        })
}

/// Evaluates every line and quadratic of `segments` at `p` and reduces the results.
pub fn aggregate(segments: &GlyphSegments<'_>, p: ControlPoint) -> Aggregate {
    if segments.exceeds_quadratic_cap() {
        return Aggregate::Overflow;
    }
    let lines = segments
        .lines
        .iter()
        .map(|&[a, b]| line_distance(p, a, b));
    let quadratics = segments
        .quadratics
        .iter()
        .map(|&[a, b, c]| quadratic_distance(p, a, b, c));
    Aggregate::Distance(reduce(lines.chain(quadratics)))
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::store::{LineSegment, QuadraticSegment};

    fn pt(x: f32, y: f32) -> ControlPoint {
        ControlPoint::new(x, y)
    }

    fn segments<'a>(
        lines: &'a [LineSegment],
        quadratics: &'a [QuadraticSegment],
    ) -> GlyphSegments<'a> {
        GlyphSegments {
            lines,
            quadratics,
            quadratic_range_len: u32::try_from(quadratics.len()).unwrap(),
        }
    }

    /// Counter-clockwise unit square.
    const SQUARE: [LineSegment; 4] = [
        [ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 0.0)],
        [ControlPoint::new(1.0, 0.0), ControlPoint::new(1.0, 1.0)],
        [ControlPoint::new(1.0, 1.0), ControlPoint::new(0.0, 1.0)],
        [ControlPoint::new(0.0, 1.0), ControlPoint::new(0.0, 0.0)],
    ];

    #[test]
    fn counter_clockwise_square_is_negative_inside() {
        let glyph = segments(&SQUARE, &[]);
        let inside = aggregate(&glyph, pt(0.3, 0.6)).signed_distance().unwrap();
        assert!((inside + 0.3).abs() < 1e-6, "expected -0.3, got {inside}");

        for p in [pt(1.5, 0.5), pt(-0.2, 0.1), pt(0.5, 1.25), pt(0.5, -0.75)] {
            let outside = aggregate(&glyph, p).signed_distance().unwrap();
            assert!(outside >= 0.0, "{p:?} is outside, got {outside}");
        }
    }

    #[test]
    fn corner_region_resolves_to_outside() {
        // Beyond the (1, 0) corner both adjacent edges clamp to the same endpoint.
        let glyph = segments(&SQUARE, &[]);
        let d = aggregate(&glyph, pt(1.5, -0.5)).signed_distance().unwrap();
        assert!(
            (d - core::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6,
            "expected +0.7071, got {d}"
        );
    }

    #[test]
    fn corner_tie_is_order_independent() {
        let mut reversed = SQUARE;
        reversed.reverse();
        let rotated = [SQUARE[1], SQUARE[2], SQUARE[3], SQUARE[0]];
        for p in [pt(1.5, -0.5), pt(-0.25, -0.25), pt(1.1, 1.3), pt(-0.4, 1.2)] {
            let expected = aggregate(&segments(&SQUARE, &[]), p);
            assert_eq!(aggregate(&segments(&reversed, &[]), p), expected);
            assert_eq!(aggregate(&segments(&rotated, &[]), p), expected);
        }
    }

    #[test]
    fn tie_prefers_larger_orthogonality() {
        let weak = SegmentDistance {
            signed_distance: -1.0,
            orthogonality: 0.2,
        };
        let strong = SegmentDistance {
            signed_distance: 1.0 + TIE_EPSILON / 2.0,
            orthogonality: -0.9,
        };
        assert_eq!(reduce([weak, strong]), strong);
        assert_eq!(reduce([strong, weak]), strong);
    }

    #[test]
    fn interior_projection_beats_endpoint() {
        let endpoint = SegmentDistance {
            signed_distance: 0.5,
            orthogonality: 1.0,
        };
        let interior = SegmentDistance {
            signed_distance: -0.5,
            orthogonality: crate::distance::NO_ORTHOGONALITY,
        };
        assert_eq!(reduce([endpoint, interior]), interior);
        assert_eq!(reduce([interior, endpoint]), interior);
    }

    #[test]
    fn nearer_segment_wins_outside_epsilon() {
        let near = SegmentDistance {
            signed_distance: 0.25,
            orthogonality: 0.0,
        };
        let far = SegmentDistance {
            signed_distance: -0.5,
            orthogonality: crate::distance::NO_ORTHOGONALITY,
        };
        assert_eq!(reduce([far, near]), near);
    }

    #[test]
    fn empty_glyph_is_infinitely_far() {
        let d = aggregate(&segments(&[], &[]), pt(0.5, 0.5));
        assert_eq!(d, Aggregate::Distance(SegmentDistance::FARTHEST));
    }

    #[test]
    fn lines_and_quadratics_are_combined() {
        // A half disc: flat bottom, curved top.
        let lines = [[pt(1.0, 0.0), pt(0.0, 0.0)]];
        let quadratics = [[pt(0.0, 0.0), pt(0.5, 1.0), pt(1.0, 0.0)]];
        // The arch runs left to right, so the contour is clockwise and the interior is
        // on the positive side.
        let glyph = segments(&lines, &quadratics);
        let d = aggregate(&glyph, pt(0.5, 0.1)).signed_distance().unwrap();
        assert!(d > 0.0, "clockwise winding puts the interior on the positive side");
        assert!((d - 0.1).abs() < 1e-5, "nearest is the flat bottom, got {d}");
    }

    #[test]
    fn oversized_quadratic_range_overflows() {
        let quadratics: Vec<QuadraticSegment> = (0..=MAX_QUADRATIC_SEGMENTS)
            .map(|_| [pt(0.0, 0.0), pt(0.5, 1.0), pt(1.0, 0.0)])
            .collect();
        assert_eq!(
            aggregate(&segments(&[], &quadratics), pt(0.5, 0.25)),
            Aggregate::Overflow
        );
        assert!(matches!(
            aggregate(&segments(&[], &quadratics[..MAX_QUADRATIC_SEGMENTS]), pt(0.5, 0.25)),
            Aggregate::Distance(_)
        ));
    }
}
