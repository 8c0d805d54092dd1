// Copyright 2025 the Glyph SDF Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This crate contains the integration test suite for `glyph_sdf`.
//!
//! - The `util` module holds the shapes and scene setup shared by the other modules.
//! - We do not use the default Rust test harness, but instead use this `mod.rs` file as the
//!   entry point to run all other tests, which keeps the shared utilities in one place.
//! - Put the topic of a test at the start of its name, e.g. `cap_501_quadratics_is_gray`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod tie_break;
mod util;
