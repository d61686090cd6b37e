// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Luminance reducer — RGB samples to 8-bit intensity using fixed-point
// weights, so results are bit-exact on every platform.

use monowerk_core::{GrayscaleGrid, PixelGrid, PixelSample};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Fixed-point channel weights in 1/256ths (≈ 0.299, 0.587, 0.114). They sum
/// to 256, so a neutral gray maps to itself.
const RED_WEIGHT: u32 = 77;
const GREEN_WEIGHT: u32 = 150;
const BLUE_WEIGHT: u32 = 29;

/// Intensity of a single sample: `(77r + 150g + 29b + 128) / 256`.
#[inline]
pub fn luminance(sample: PixelSample) -> u8 {
    let weighted = sample.red as u32 * RED_WEIGHT
        + sample.green as u32 * GREEN_WEIGHT
        + sample.blue as u32 * BLUE_WEIGHT
        + 128;
    // Max is 255 * 256 + 128, which still fits in a u8 after the shift.
    (weighted >> 8) as u8
}

/// Reduce a pixel grid to one intensity per pixel.
///
/// Rows are processed in parallel; each worker writes a disjoint output row,
/// so the result is identical to a sequential pass.
#[instrument(skip_all, fields(width = pixels.width(), height = pixels.height()))]
pub fn reduce(pixels: &PixelGrid) -> GrayscaleGrid {
    let row_len = pixels.width() as usize;
    let gray = GrayscaleGrid::derive_from(pixels, |samples, out| {
        out.par_chunks_mut(row_len)
            .zip(samples.par_chunks(row_len))
            .for_each(|(out_row, in_row)| {
                for (dst, &src) in out_row.iter_mut().zip(in_row) {
                    *dst = luminance(src);
                }
            });
    });
    debug!("Luminance reduction complete");
    gray
}
