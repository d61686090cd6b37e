// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Threshold suggestion. Picking the threshold is a business decision; this
// only offers Otsu's histogram split as a starting point. The result still
// has to be placed in an explicit `BinarizationConfig`.

use imageproc::contrast::otsu_level;
use monowerk_core::GrayscaleGrid;
use tracing::{debug, instrument};

use crate::interop::grayscale_to_luma;

/// Otsu's level for `gray`: the threshold that maximises the between-class
/// variance of the black and white groups.
#[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
pub fn suggest_threshold(gray: &GrayscaleGrid) -> u8 {
    let image = grayscale_to_luma(gray);
    let level = otsu_level(&image);
    debug!(level, "Otsu threshold computed");
    level
}
