// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The winner among equally near segments does not depend on visiting order.

use glyph_sdf::aggregate::{TIE_EPSILON, aggregate, reduce};
use glyph_sdf::distance::{SegmentDistance, line_distance, quadratic_distance};
use glyph_sdf::store::{GlyphSegments, LineSegment, QuadraticSegment};

use crate::util::{grid, permutations, pt};

fn segments<'a>(lines: &'a [LineSegment], quadratics: &'a [QuadraticSegment]) -> GlyphSegments<'a> {
    GlyphSegments {
        lines,
        quadratics,
        quadratic_range_len: quadratics.len() as u32,
    }
}

/// An L shape, counter-clockwise, with one concave corner at (0.4, 0.4).
fn l_shape() -> Vec<LineSegment> {
    let points = [
        pt(0.1, 0.1),
        pt(0.9, 0.1),
        pt(0.9, 0.4),
        pt(0.4, 0.4),
        pt(0.4, 0.9),
        pt(0.1, 0.9),
    ];
    (0..points.len())
        .map(|i| [points[i], points[(i + 1) % points.len()]])
        .collect()
}

#[test]
fn tie_break_square_corners_in_every_order() {
    let square = [
        [pt(0.0, 0.0), pt(1.0, 0.0)],
        [pt(1.0, 0.0), pt(1.0, 1.0)],
        [pt(1.0, 1.0), pt(0.0, 1.0)],
        [pt(0.0, 1.0), pt(0.0, 0.0)],
    ];
    let queries = [pt(1.5, -0.5), pt(-0.3, -0.1), pt(1.2, 1.2), pt(-0.1, 1.4), pt(0.5, 0.5)];
    for p in queries {
        let expected = aggregate(&segments(&square, &[]), p);
        for order in permutations(&square) {
            assert_eq!(
                aggregate(&segments(&order, &[]), p),
                expected,
                "{p:?} in order {order:?}"
            );
        }
    }
}

#[test]
fn tie_break_concave_corner_is_order_independent_and_correct() {
    let lines = l_shape();
    let orders = permutations(&lines);
    assert_eq!(orders.len(), 720);

    // Inside the notch and on the diagonal through the concave corner.
    let notch = [pt(0.6, 0.6), pt(0.45, 0.45), pt(0.7, 0.5)];
    // Inside the L, near the concave corner.
    let inner = [pt(0.35, 0.35), pt(0.38, 0.3), pt(0.3, 0.38)];
    for p in notch {
        let d = aggregate(&segments(&lines, &[]), p).signed_distance().unwrap();
        assert!(d >= 0.0, "{p:?} lies in the notch, got {d}");
    }
    for p in inner {
        let d = aggregate(&segments(&lines, &[]), p).signed_distance().unwrap();
        assert!(d < 0.0, "{p:?} lies inside the L, got {d}");
    }
    for p in notch.into_iter().chain(inner) {
        let expected = aggregate(&segments(&lines, &[]), p);
        for order in &orders {
            assert_eq!(aggregate(&segments(order, &[]), p), expected, "{p:?}");
        }
    }
}

#[test]
fn tie_break_signs_agree_with_winding_everywhere() {
    // Classify every grid point of the L shape by containment and compare.
    let lines = l_shape();
    let contains = |x: f32, y: f32| {
        let in_base = (0.1..0.9).contains(&x) && (0.1..0.4).contains(&y);
        let in_stem = (0.1..0.4).contains(&x) && (0.1..0.9).contains(&y);
        in_base || in_stem
    };
    for p in grid(50, 0.0, 1.0) {
        let d = aggregate(&segments(&lines, &[]), p).signed_distance().unwrap();
        if d.abs() < 1e-3 {
            continue;
        }
        assert_eq!(d < 0.0, contains(p.x, p.y), "{p:?}: distance {d}");
    }
}

#[test]
fn tie_break_mixed_line_and_quadratic() {
    // A quadratic arch closed by a straight base, sharing both endpoints.
    let lines = [[pt(0.9, 0.2), pt(0.1, 0.2)]];
    let quadratics = [[pt(0.1, 0.2), pt(0.5, 1.4), pt(0.9, 0.2)]];
    let arch = segments(&lines, &quadratics);
    // Clockwise: the base runs right to left.
    for p in [pt(0.05, 0.1), pt(0.95, 0.1), pt(1.0, 0.2), pt(0.0, 0.2)] {
        let forward = aggregate(&arch, p);
        let candidates = [
            line_distance(p, lines[0][0], lines[0][1]),
            quadratic_distance(p, quadratics[0][0], quadratics[0][1], quadratics[0][2]),
        ];
        let reversed = reduce(candidates.into_iter().rev());
        assert_eq!(forward.signed_distance(), Some(reversed.signed_distance), "{p:?}");
    }
}

#[test]
fn tie_break_within_epsilon_uses_orthogonality() {
    let base = SegmentDistance {
        signed_distance: 0.3,
        orthogonality: 0.1,
    };
    let perpendicular = SegmentDistance {
        signed_distance: -(0.3 + TIE_EPSILON * 0.5),
        orthogonality: 0.95,
    };
    let far = SegmentDistance {
        signed_distance: 0.3 + TIE_EPSILON * 2.0,
        orthogonality: 1.0,
    };
    for order in permutations(&[0_usize, 1, 2]) {
        let items = [base, perpendicular, far];
        let winner = reduce(order.iter().map(|&i| items[i]));
        assert_eq!(winner, perpendicular, "order {order:?}");
    }
}
