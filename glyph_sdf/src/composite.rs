// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Maps an aggregated signed distance to a pixel color.

use crate::aggregate::Aggregate;
use crate::color::Rgba8;

/// Factor applied to the signed distance before blending.
///
/// Shape space spans the glyph's quad edge, so one hundredth of it is fully ramped.
pub const BLEND_SHARPNESS: f32 = 100.0;

/// Distances below this are foreground in [`CompositeMode::Threshold`].
pub const THRESHOLD: f32 = 0.01;

/// Drawn over glyphs whose quadratic range trips the safety cap.
pub const DIAGNOSTIC_GRAY: Rgba8 = Rgba8 {
    r: 128,
    g: 128,
    b: 128,
    a: 255,
};

/// How a signed distance becomes a color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompositeMode {
    /// Linear ramp from foreground to background over the first hundredth of shape
    /// space outside the outline. Inside is solid foreground.
    #[default]
    Blend,
    /// Hard step at [`THRESHOLD`].
    Threshold,
}

/// Colors one pixel of a glyph.
pub fn composite(aggregate: Aggregate, mode: CompositeMode, fg: Rgba8, bg: Rgba8) -> Rgba8 {
    let Aggregate::Distance(d) = aggregate else {
        return DIAGNOSTIC_GRAY;
    };
    let d = d.signed_distance;
    match mode {
        CompositeMode::Blend => lerp(fg, bg, d * BLEND_SHARPNESS),
        CompositeMode::Threshold => {
            if d < THRESHOLD {
                fg
            } else {
                bg
            }
        }
    }
}

/// Channel-wise interpolation from `a` at `t <= 0` to `b` at `t >= 1`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "interpolated channels stay between two u8 values"
)]
fn lerp(a: Rgba8, b: Rgba8, t: f32) -> Rgba8 {
    // NaN maps to the background.
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    let channel = |a: u8, b: u8| {
        let v = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
        (v + 0.5) as u8
    };
    Rgba8 {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
        a: channel(a.a, b.a),
    }
}
