// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A CPU implementation of the per-pixel pipeline.
//!
//! Each instance covers the pixels whose centers fall inside its transformed unit quad.
//! For each of those pixels the rasterizer recovers the local coordinate, aggregates the
//! glyph's segment distances there and writes the composited color. Instances are drawn
//! in order, and later instances overwrite earlier ones where their quads overlap.
//!
//! Pixel row 0 is the top of the target, while clip space y points up.

use alloc::vec::Vec;
use core::ops::Range;

use crate::aggregate::{MAX_QUADRATIC_SEGMENTS, aggregate};
use crate::color::Rgba8;
use crate::composite::{CompositeMode, composite};
use crate::instance::GlyphInstance;
use crate::math::ControlPoint;
use crate::pixmap::Pixmap;
use crate::store::{GlyphCurveStore, GlyphSegments};
use crate::transform::{LocalMapping, ScreenTransform, UNIT_QUAD, transform_vertex};
use crate::Error;

#[cfg(not(feature = "std"))]
use crate::kurbo::common::FloatFuncs as _;

/// Options for a [`Rasterizer`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderSettings {
    /// How distances become colors.
    pub mode: CompositeMode,
    /// Number of worker threads. Zero renders on the calling thread.
    ///
    /// Ignored without the `multithreading` feature. The output does not depend on it.
    pub num_threads: u16,
}

/// Renders glyph instances into a [`Pixmap`].
#[derive(Debug)]
pub struct Rasterizer {
    settings: RenderSettings,
    #[cfg(feature = "multithreading")]
    pool: Option<rayon::ThreadPool>,
}

impl Rasterizer {
    /// Creates a rasterizer, spawning its worker threads if any are requested.
    pub fn new(settings: RenderSettings) -> Result<Self, Error> {
        #[cfg(feature = "multithreading")]
        let pool = if settings.num_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(usize::from(settings.num_threads))
                .thread_name(|i| alloc::format!("glyph_sdf-{i}"))
                .build()
                .map_err(|err| {
                    log::error!("failed to spawn render threads: {err}");
                    Error::thread_pool()
                })?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            settings,
            #[cfg(feature = "multithreading")]
            pool,
        })
    }

    /// The settings this rasterizer was created with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Draws `instances` over the current contents of `target`.
    ///
    /// Every instance's curve ranges are validated against `store` before drawing
    /// starts; on error the target is left untouched.
    pub fn render(
        &self,
        store: &GlyphCurveStore,
        instances: &[GlyphInstance],
        global: &ScreenTransform,
        target: &mut Pixmap,
    ) -> Result<(), Error> {
        let (width, height) = (target.width(), target.height());
        let prepared = prepare(store, instances, global, width, height)?;
        log::debug!(
            "rendering {} of {} glyph instances into {width}x{height}",
            prepared.len(),
            instances.len()
        );
        if prepared.is_empty() {
            return Ok(());
        }

        let pass = Pass {
            prepared: &prepared,
            mode: self.settings.mode,
            width: f32::from(width),
            height: f32::from(height),
        };
        let row_len = usize::from(width);

        #[cfg(feature = "multithreading")]
        if let Some(pool) = &self.pool {
            use rayon::prelude::*;

            pool.install(|| {
                target
                    .data_mut()
                    .par_chunks_mut(row_len)
                    .enumerate()
                    .for_each(|(y, row)| pass.render_row(y, row));
            });
            return Ok(());
        }

        for (y, row) in target.data_mut().chunks_mut(row_len).enumerate() {
            pass.render_row(y, row);
        }
        Ok(())
    }

    /// Like [`render`](Self::render), into a new `width` by `height` pixmap.
    pub fn render_to_pixmap(
        &self,
        store: &GlyphCurveStore,
        instances: &[GlyphInstance],
        global: &ScreenTransform,
        width: u16,
        height: u16,
    ) -> Result<Pixmap, Error> {
        let mut pixmap = Pixmap::new(width, height);
        self.render(store, instances, global, &mut pixmap)?;
        Ok(pixmap)
    }
}

/// Colors the glyph of `instance` at the shape space coordinate `local`.
///
/// This is the whole per-pixel computation. It reads nothing but its arguments.
pub fn shade(
    segments: &GlyphSegments<'_>,
    instance: &GlyphInstance,
    local: ControlPoint,
    mode: CompositeMode,
) -> Rgba8 {
    composite(
        aggregate(segments, local),
        mode,
        instance.foreground(),
        instance.background(),
    )
}

/// An instance with its segments resolved and its pixel footprint computed.
struct Prepared<'a> {
    instance: &'a GlyphInstance,
    segments: GlyphSegments<'a>,
    mapping: LocalMapping,
    columns: Range<usize>,
    rows: Range<usize>,
}

fn prepare<'a>(
    store: &'a GlyphCurveStore,
    instances: &'a [GlyphInstance],
    global: &ScreenTransform,
    width: u16,
    height: u16,
) -> Result<Vec<Prepared<'a>>, Error> {
    let mut prepared = Vec::with_capacity(instances.len());
    for (idx, instance) in instances.iter().enumerate() {
        let segments = store.segments(instance)?;
        if segments.exceeds_quadratic_cap() {
            log::warn!(
                "glyph instance {idx} references {} quadratics, more than the limit of \
                 {MAX_QUADRATIC_SEGMENTS}; drawing diagnostic fill",
                segments.quadratic_range_len
            );
        }
        let Some(mapping) = LocalMapping::new(instance, global) else {
            log::trace!("skipping glyph instance {idx} with degenerate scale");
            continue;
        };
        let Some((columns, rows)) = footprint(instance, global, width, height) else {
            continue;
        };
        prepared.push(Prepared {
            instance,
            segments,
            mapping,
            columns,
            rows,
        });
    }
    Ok(prepared)
}

/// The pixel columns and rows whose centers may fall inside the instance's quad.
fn footprint(
    instance: &GlyphInstance,
    global: &ScreenTransform,
    width: u16,
    height: u16,
) -> Option<(Range<usize>, Range<usize>)> {
    let mut min = [f32::INFINITY; 2];
    let mut max = [f32::NEG_INFINITY; 2];
    for vertex in &UNIT_QUAD {
        let clip = transform_vertex(vertex, instance, global).clip_position;
        for i in 0..2 {
            min[i] = min[i].min(clip[i]);
            max[i] = max[i].max(clip[i]);
        }
    }
    let (w, h) = (f32::from(width), f32::from(height));
    // A pixel center at index i sits at clip (i + 0.5) / len * 2 - 1, flipped for rows.
    let columns = span((min[0] + 1.0) * 0.5 * w - 0.5, (max[0] + 1.0) * 0.5 * w - 0.5, width)?;
    let rows = span((1.0 - max[1]) * 0.5 * h - 0.5, (1.0 - min[1]) * 0.5 * h - 0.5, height)?;
    Some((columns, rows))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "bounds are clamped to the target size before conversion"
)]
fn span(lo: f32, hi: f32, len: u16) -> Option<Range<usize>> {
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    let start = lo.floor().max(0.0);
    let end = (hi.ceil() + 1.0).min(f32::from(len));
    (start < end).then(|| start as usize..end as usize)
}

/// Shared, read-only state of one render pass.
struct Pass<'a> {
    prepared: &'a [Prepared<'a>],
    mode: CompositeMode,
    width: f32,
    height: f32,
}

impl Pass<'_> {
    #[allow(
        clippy::cast_precision_loss,
        reason = "pixel indices are bounded by u16::MAX"
    )]
    fn render_row(&self, y: usize, row: &mut [Rgba8]) {
        let clip_y = 1.0 - (y as f32 + 0.5) / self.height * 2.0;
        for glyph in self.prepared {
            if !glyph.rows.contains(&y) {
                continue;
            }
            for x in glyph.columns.clone() {
                let clip_x = (x as f32 + 0.5) / self.width * 2.0 - 1.0;
                let local = glyph.mapping.local([clip_x, clip_y]);
                if !(0.0..=1.0).contains(&local.x) || !(0.0..=1.0).contains(&local.y) {
                    continue;
                }
                row[x] = shade(&glyph.segments, glyph.instance, local, self.mode);
            }
        }
    }
}
