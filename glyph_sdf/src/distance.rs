// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-form signed distance from a point to a line or quadratic Bézier segment.
//!
//! The sign follows the segment's direction: a point to the left of the direction of
//! travel gets a negative distance. For a contour wound counter-clockwise (with y up)
//! that makes the interior negative.
//!
//! Besides the distance, each evaluation reports an orthogonality score. It is only
//! meaningful when the nearest point was clamped to an endpoint of the segment, which is
//! exactly the situation where two segments meeting at a corner produce the same
//! distance. The aggregator uses it to pick between them. When the nearest point is
//! interior the score is [`NO_ORTHOGONALITY`], which outranks any endpoint score.

use crate::math::{ControlPoint, sign_or_positive};

#[cfg(not(feature = "std"))]
use crate::kurbo::common::FloatFuncs as _;

/// Orthogonality reported when the nearest point is not a clamped endpoint.
pub const NO_ORTHOGONALITY: f32 = f32::INFINITY;

/// Orthogonality reported by zero-length segments, so they lose every tie.
pub const DEGENERATE_ORTHOGONALITY: f32 = 0.0;

/// Quadratics with `|A - 2B + C|²` at or below this fraction of their squared control
/// polygon size are treated as the straight line `A..C`.
const QUADRATIC_DEGENERACY: f32 = 1e-4;

const SQRT_3: f32 = 1.732_050_8;

/// The result of evaluating one segment at one point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentDistance {
    /// Distance to the nearest point of the segment; negative on the inner side.
    pub signed_distance: f32,
    /// Tie-break score; see the [module docs](self).
    pub orthogonality: f32,
}

impl SegmentDistance {
    /// Starting value of a reduction: infinitely far, and losing every tie.
    pub const FARTHEST: Self = Self {
        signed_distance: f32::INFINITY,
        orthogonality: f32::NEG_INFINITY,
    };

    /// The unsigned distance.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.signed_distance.abs()
    }

    /// Whether the point is on the inner side.
    #[inline]
    pub fn is_inside(&self) -> bool {
        self.signed_distance < 0.0
    }
}

/// Nearest point on a segment.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Nearest {
    /// Curve parameter in `[0, 1]`.
    #[allow(dead_code, reason = "only inspected by tests")]
    pub(crate) t: f32,
    /// Whether the unconstrained minimizer fell outside `[0, 1]`.
    pub(crate) clamped: bool,
    pub(crate) point: ControlPoint,
    pub(crate) tangent: ControlPoint,
}

impl Nearest {
    fn evaluate(&self, p: ControlPoint) -> SegmentDistance {
        let to_curve = self.point - p;
        let distance = to_curve.length();
        let orthogonality = if self.clamped && distance > 0.0 {
            match (self.tangent.normalize(), to_curve.normalize()) {
                (Some(tangent), Some(offset)) => tangent.cross(offset),
                _ => NO_ORTHOGONALITY,
            }
        } else {
            NO_ORTHOGONALITY
        };
        SegmentDistance {
            signed_distance: distance * sign_or_positive(self.tangent.cross(to_curve)),
            orthogonality,
        }
    }
}

#[inline]
fn clamp_unit(raw: f32) -> (f32, bool) {
    if raw.is_nan() {
        return (0.0, true);
    }
    let t = raw.clamp(0.0, 1.0);
    (t, t != raw)
}

pub(crate) fn line_nearest(p: ControlPoint, a: ControlPoint, b: ControlPoint) -> Option<Nearest> {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if !(len_sq > 0.0 && len_sq.is_finite()) {
        return None;
    }
    let (t, clamped) = clamp_unit((p - a).dot(ab) / len_sq);
    Some(Nearest {
        t,
        clamped,
        point: a.lerp(b, t),
        tangent: ab,
    })
}

/// Signed distance from `p` to the line segment `a..b`.
///
/// A zero-length segment yields the plain distance to `a`, a positive sign and
/// [`DEGENERATE_ORTHOGONALITY`].
pub fn line_distance(p: ControlPoint, a: ControlPoint, b: ControlPoint) -> SegmentDistance {
    match line_nearest(p, a, b) {
        Some(nearest) => nearest.evaluate(p),
        None => SegmentDistance {
            signed_distance: (p - a).length(),
            orthogonality: DEGENERATE_ORTHOGONALITY,
        },
    }
}

/// Finds the nearest point of `(1-t)²A + 2(1-t)tB + t²C` to `p`, or `None` when the
/// curve is too close to a straight line for the cubic to be well conditioned.
pub(crate) fn quadratic_nearest(
    p: ControlPoint,
    a: ControlPoint,
    b: ControlPoint,
    c: ControlPoint,
) -> Option<Nearest> {
    let va = b - a;
    let vb = a - b * 2.0 + c;
    let bb = vb.length_squared();
    let polygon = va.length_squared() + (c - a).length_squared();
    if !(bb > QUADRATIC_DEGENERACY * polygon && bb.is_finite()) {
        return None;
    }

    // Bt(t) - p = vd + vc t + vb t², and the stationary points of its squared length
    // solve t³ + 3kx t² + 3ky t + kz = 0.
    let vc = va * 2.0;
    let vd = a - p;
    let k = 1.0 / bb;
    let kx = k * va.dot(vb);
    let ky = k * (2.0 * va.dot(va) + vd.dot(vb)) / 3.0;
    let kz = k * vd.dot(va);

    // Depressed cubic x³ + 3px + q = 0 with t = x - kx.
    let dp = ky - kx * kx;
    let dq = kx * (2.0 * kx * kx - 3.0 * ky) + kz;
    let h = dq * dq + 4.0 * dp * dp * dp;

    let offset_at = |t: f32| vd + (vc + vb * t) * t;
    let (t, clamped) = if h >= 0.0 {
        // One real root (Cardano).
        let h = h.sqrt();
        let root = ((h - dq) * 0.5).cbrt() + ((-h - dq) * 0.5).cbrt() - kx;
        clamp_unit(root)
    } else {
        // Three real roots. The middle one is a local maximum of the distance and is
        // never the nearest.
        let z = (-dp).sqrt();
        let v = (dq / (dp * z * 2.0)).clamp(-1.0, 1.0).acos() / 3.0;
        let m = v.cos();
        let n = v.sin() * SQRT_3;
        let first = clamp_unit((m + m) * z - kx);
        let second = clamp_unit((-n - m) * z - kx);
        if offset_at(first.0).length_squared() <= offset_at(second.0).length_squared() {
            first
        } else {
            second
        }
    };

    let point = p + offset_at(t);
    let tangent = (b - a) * (2.0 * (1.0 - t)) + (c - b) * (2.0 * t);
    let tangent = if tangent.normalize().is_some() {
        tangent
    } else {
        // The derivative vanishes where the control point coincides with an endpoint.
        c - a
    };
    Some(Nearest {
        t,
        clamped,
        point,
        tangent,
    })
}

/// Signed distance from `p` to the quadratic Bézier segment with endpoints `a`, `c` and
/// control point `b`.
///
/// Near-straight curves, including `a == b == c`, are evaluated as the line `a..c`.
pub fn quadratic_distance(
    p: ControlPoint,
    a: ControlPoint,
    b: ControlPoint,
    c: ControlPoint,
) -> SegmentDistance {
    match quadratic_nearest(p, a, b, c) {
        Some(nearest) => nearest.evaluate(p),
        None => line_distance(p, a, c),
    }
}
