// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph SDF renders glyph outlines by evaluating the exact signed distance to each
//! glyph's line and quadratic Bézier segments at every covered pixel.
//!
//! There is no distance-field texture and no tessellation. The building blocks are:
//!
//! - [`GlyphCurveStore`]: flat, append-only control-point buffers shared by every glyph
//!   of a draw batch, addressed with [`CurveRange`] handles.
//! - [`GlyphInstance`]: a transient, per-draw record placing one glyph on screen.
//! - [`transform`]: the affine map from the unit quad to clip space.
//! - [`distance`]: closed-form nearest-point solvers for lines and quadratics.
//! - [`aggregate`]: reduces the per-segment distances of one glyph to a single value.
//! - [`composite`]: turns that value into a color.
//! - [`Rasterizer`]: runs the whole per-pixel pipeline on the CPU into a [`Pixmap`].
//!
//! ## Features
//!
//! - `std` (enabled by default): Get floating point functions from the standard library
//!   (likely using your target's libc).
//! - `libm`: Use floating point implementations from [libm].
//! - `multithreading`: Evaluate pixel rows on a [rayon] thread pool.
//! - `skrifa`: Load glyph outlines from fonts with [skrifa].
//! - `png`: Encode a [`Pixmap`] as PNG.
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//!
//! [libm]: https://crates.io/crates/libm

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("glyph_sdf requires either the `std` or `libm` feature to be enabled");

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use peniko::{color, kurbo};

mod error;
mod math;
mod pixmap;

pub mod aggregate;
pub mod atlas;
pub mod composite;
pub mod distance;
pub mod instance;
#[cfg(feature = "skrifa")]
pub mod outline;
pub mod raster;
pub mod store;
pub mod transform;

pub use atlas::{CurveAtlas, GlyphEntry, GlyphKey, GlyphMetrics};
pub use composite::CompositeMode;
pub use error::{Error, ErrorKind};
pub use instance::GlyphInstance;
pub use math::ControlPoint;
pub use pixmap::Pixmap;
pub use raster::{Rasterizer, RenderSettings};
pub use store::{CurveRange, GlyphBuilder, GlyphCurveStore, GlyphCurves, GlyphSegments};
pub use transform::{QuadVertex, ScreenTransform};
