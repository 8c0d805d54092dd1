// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-draw glyph records.

use crate::atlas::GlyphMetrics;
use crate::color::Rgba8;
use crate::store::{CurveRange, GlyphCurves};

/// One rendered glyph: where the unit quad goes, which colors to use, and which curves
/// in the shared [`GlyphCurveStore`](crate::GlyphCurveStore) make up the outline.
///
/// Instances are built per draw call and never mutate the store. The layout is `Pod`
/// so a batch can be uploaded as-is.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphInstance {
    /// Translation of the unit quad, in world units.
    pub position: [f32; 2],
    /// Scale of the unit quad, in world units.
    pub scale: [f32; 2],
    /// Foreground (ink) color, as RGBA bytes.
    pub fg: [u8; 4],
    /// Background color, as RGBA bytes.
    pub bg: [u8; 4],
    /// Line segments of the outline.
    pub lines: CurveRange,
    /// Quadratic segments of the outline.
    pub quadratics: CurveRange,
    /// Reserved for cubic segments; ignored during evaluation.
    pub cubics: CurveRange,
}

impl GlyphInstance {
    /// Creates an instance from an explicit placement.
    pub fn new(
        position: [f32; 2],
        scale: [f32; 2],
        fg: Rgba8,
        bg: Rgba8,
        curves: GlyphCurves,
    ) -> Self {
        Self {
            position,
            scale,
            fg: to_bytes(fg),
            bg: to_bytes(bg),
            lines: curves.lines,
            quadratics: curves.quadratics,
            cubics: curves.cubics,
        }
    }

    /// Places a glyph whose pen position is `origin`, scaling its em-unit metrics by
    /// `font_size`.
    pub fn from_metrics(
        metrics: &GlyphMetrics,
        curves: GlyphCurves,
        origin: [f32; 2],
        font_size: f32,
        fg: Rgba8,
        bg: Rgba8,
    ) -> Self {
        let position = [
            origin[0] + metrics.offset[0] * font_size,
            origin[1] + metrics.offset[1] * font_size,
        ];
        let scale = [
            metrics.extent[0] * font_size,
            metrics.extent[1] * font_size,
        ];
        Self::new(position, scale, fg, bg, curves)
    }

    /// The foreground color.
    pub fn foreground(&self) -> Rgba8 {
        from_bytes(self.fg)
    }

    /// The background color.
    pub fn background(&self) -> Rgba8 {
        from_bytes(self.bg)
    }

    /// The curve ranges of this instance.
    pub fn curves(&self) -> GlyphCurves {
        GlyphCurves {
            lines: self.lines,
            quadratics: self.quadratics,
            cubics: self.cubics,
        }
    }
}

fn to_bytes(color: Rgba8) -> [u8; 4] {
    [color.r, color.g, color.b, color.a]
}

fn from_bytes([r, g, b, a]: [u8; 4]) -> Rgba8 {
    Rgba8 { r, g, b, a }
}
