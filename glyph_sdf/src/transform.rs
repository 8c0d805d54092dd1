// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The vertex stage: places the unit quad of each glyph instance in clip space.
//!
//! A vertex goes through two scale-and-translate steps, first the instance placement and
//! then the global screen transform:
//!
//! ```text
//! clip = (vertex * instance.scale + instance.position) * global.scale + global.translate
//! ```
//!
//! The vertex's local coordinate is passed through untouched and becomes the per-pixel
//! query point for distance evaluation.

use crate::instance::GlyphInstance;
use crate::math::{ControlPoint, FloatExt};

/// The global world-to-clip transform, shared by every instance of a pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenTransform {
    /// Per-axis scale.
    pub scale: [f32; 2],
    /// Per-axis translation, applied after scaling.
    pub translate: [f32; 2],
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScreenTransform {
    /// World space is clip space.
    pub const IDENTITY: Self = Self {
        scale: [1.0, 1.0],
        translate: [0.0, 0.0],
    };

    /// World units are pixels of a `width` by `height` viewport, with the origin in the
    /// bottom left corner and y pointing up.
    pub fn pixels(width: u16, height: u16) -> Self {
        let width = f32::from(width.max(1));
        let height = f32::from(height.max(1));
        Self {
            scale: [2.0 / width, 2.0 / height],
            translate: [-1.0, -1.0],
        }
    }

    /// One world unit is the viewport height, x runs from 0 to `width / height` and y
    /// spans -1 to 1. This suits a horizontal strip of text.
    pub fn strip(width: u16, height: u16) -> Self {
        let width = f32::from(width.max(1));
        let height = f32::from(height.max(1));
        Self {
            scale: [2.0 * height / width, 1.0],
            translate: [-1.0, 0.0],
        }
    }
}

/// A vertex of the quad covering one glyph.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Position before instance placement.
    pub position: [f32; 2],
    /// Shape space coordinate at this corner.
    pub local: ControlPoint,
}

/// The unit quad. Its local coordinates equal its positions, so the covered shape space
/// is `[0, 1]²`.
pub const UNIT_QUAD: [QuadVertex; 4] = [
    QuadVertex {
        position: [0.0, 0.0],
        local: ControlPoint::new(0.0, 0.0),
    },
    QuadVertex {
        position: [1.0, 0.0],
        local: ControlPoint::new(1.0, 0.0),
    },
    QuadVertex {
        position: [1.0, 1.0],
        local: ControlPoint::new(1.0, 1.0),
    },
    QuadVertex {
        position: [0.0, 1.0],
        local: ControlPoint::new(0.0, 1.0),
    },
];

/// Two counter-clockwise triangles over [`UNIT_QUAD`].
pub const UNIT_QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Output of the vertex stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VertexOutput {
    /// Position in clip space.
    pub clip_position: [f32; 2],
    /// The vertex's local coordinate, unchanged.
    pub local: ControlPoint,
}

/// Runs the vertex stage for one vertex of one instance.
pub fn transform_vertex(
    vertex: &QuadVertex,
    instance: &GlyphInstance,
    global: &ScreenTransform,
) -> VertexOutput {
    let axis = |i: usize| {
        (vertex.position[i] * instance.scale[i] + instance.position[i]) * global.scale[i]
            + global.translate[i]
    };
    VertexOutput {
        clip_position: [axis(0), axis(1)],
        local: vertex.local,
    }
}

/// The inverse of the vertex stage over [`UNIT_QUAD`]: recovers the local coordinate
/// that interpolation would produce at a given clip space position.
#[derive(Copy, Clone, Debug)]
pub(crate) struct LocalMapping {
    scale: [f32; 2],
    offset: [f32; 2],
}

impl LocalMapping {
    /// Returns `None` when either combined scale is degenerate, in which case the quad
    /// covers no area.
    pub(crate) fn new(instance: &GlyphInstance, global: &ScreenTransform) -> Option<Self> {
        let mut scale = [0.0; 2];
        let mut offset = [0.0; 2];
        for i in 0..2 {
            // clip = local * s + o
            let s = instance.scale[i] * global.scale[i];
            if s.is_nearly_zero() || !s.is_finite() {
                return None;
            }
            let o = instance.position[i] * global.scale[i] + global.translate[i];
            scale[i] = 1.0 / s;
            offset[i] = o;
        }
        Some(Self { scale, offset })
    }

    #[inline]
    pub(crate) fn local(&self, clip: [f32; 2]) -> ControlPoint {
        ControlPoint::new(
            (clip[0] - self.offset[0]) * self.scale[0],
            (clip[1] - self.offset[1]) * self.scale[1],
        )
    }
}
