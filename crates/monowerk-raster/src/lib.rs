// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// monowerk-raster — Turns rendered page images into 1-bit rasters.
//
// Provides integer luminance reduction, fixed-threshold binarization with
// MSB-first row-aligned bit packing, an Otsu threshold suggestion, and the
// PNG boundary adapter that writes the packed plane at bit depth 1.

pub mod binarize;
pub mod convert;
pub mod encode;
pub mod interop;
pub mod luminance;
pub mod threshold;

// Re-export the primary entry points so callers can use `monowerk_raster::binarize` etc.
pub use binarize::{binarize, binarize_samples};
pub use convert::BilevelConverter;
pub use encode::png::{encode_png, write_png};
pub use luminance::{luminance, reduce};
pub use threshold::suggest_threshold;
