// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mathematical helper functions.

use core::ops::{Add, Mul, Neg, Sub};

#[cfg(not(feature = "std"))]
use crate::kurbo::common::FloatFuncs as _;

/// Extra methods on `f32`.
pub(crate) trait FloatExt {
    /// Whether the number is zero within [`f32::EPSILON`].
    fn is_nearly_zero(self) -> bool;
}

impl FloatExt for f32 {
    #[inline(always)]
    fn is_nearly_zero(self) -> bool {
        self.abs() <= Self::EPSILON
    }
}

/// A 2D coordinate in glyph-local shape space.
///
/// Control points and per-pixel query coordinates share this space, so no transform is
/// applied between reading a curve buffer and evaluating a distance.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ControlPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, pointing up.
    pub y: f32,
}

impl ControlPoint {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new control point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub(crate) fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// The z component of the 3D cross product.
    #[inline]
    pub(crate) fn cross(self, rhs: Self) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    pub(crate) fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub(crate) fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector in this direction, or `None` for a zero-length vector.
    #[inline]
    pub(crate) fn normalize(self) -> Option<Self> {
        let len = self.length();
        (len > 0.0 && len.is_finite()).then(|| self * (1.0 / len))
    }

    #[inline]
    pub(crate) fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    pub(crate) fn to_kurbo(self) -> crate::kurbo::Point {
        crate::kurbo::Point::new(f64::from(self.x), f64::from(self.y))
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "shape space coordinates are stored at f32 precision"
    )]
    pub(crate) fn from_kurbo(point: crate::kurbo::Point) -> Self {
        Self::new(point.x as f32, point.y as f32)
    }
}

impl From<[f32; 2]> for ControlPoint {
    #[inline]
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<ControlPoint> for [f32; 2] {
    #[inline]
    fn from(point: ControlPoint) -> Self {
        [point.x, point.y]
    }
}

impl Add for ControlPoint {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for ControlPoint {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for ControlPoint {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for ControlPoint {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Sign with zero counted as positive, so callers never produce a zero-magnitude result
/// from a non-zero distance.
#[inline]
pub(crate) fn sign_or_positive(value: f32) -> f32 {
    if value < 0.0 { -1.0 } else { 1.0 }
}
