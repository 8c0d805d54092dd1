// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for fallible store, atlas and rasterizer operations.

use crate::store::CurveRange;

/// An error raised while building curve buffers or preparing a render pass.
///
/// Per-pixel evaluation never fails; every error here is detected once, before any
/// pixel is touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    range: Option<CurveRange>,
    len: u32,
}

impl Error {
    pub(crate) fn capacity_overflow() -> Self {
        Self {
            kind: ErrorKind::CapacityOverflow,
            range: None,
            len: u32::MAX,
        }
    }

    pub(crate) fn range_out_of_bounds(range: CurveRange, len: u32) -> Self {
        Self {
            kind: ErrorKind::RangeOutOfBounds,
            range: Some(range),
            len,
        }
    }

    #[cfg(feature = "multithreading")]
    pub(crate) fn thread_pool() -> Self {
        Self {
            kind: ErrorKind::ThreadPool,
            range: None,
            len: 0,
        }
    }

    #[cfg(feature = "skrifa")]
    pub(crate) fn outline() -> Self {
        Self {
            kind: ErrorKind::Outline,
            range: None,
            len: 0,
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The offending range, for [`ErrorKind::RangeOutOfBounds`].
    pub fn range(&self) -> Option<CurveRange> {
        self.range
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::CapacityOverflow => {
                write!(f, "curve buffer would exceed {} curves", self.len)
            }
            ErrorKind::RangeOutOfBounds => match self.range {
                Some(range) => write!(
                    f,
                    "curve range {}..{} out of bounds for buffer of {} curves",
                    range.offset,
                    u64::from(range.offset) + u64::from(range.count),
                    self.len
                ),
                None => write!(f, "curve range out of bounds"),
            },
            ErrorKind::ThreadPool => write!(f, "failed to build the render thread pool"),
            ErrorKind::Outline => write!(f, "failed to draw glyph outline"),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Appending would push a curve buffer past `u32::MAX` curves.
    CapacityOverflow,

    /// A [`CurveRange`] of a glyph instance reaches past the end of its buffer.
    RangeOutOfBounds,

    /// The worker pool for multithreaded rendering could not be created.
    ThreadPool,

    /// The font outline could not be drawn.
    Outline,
}
