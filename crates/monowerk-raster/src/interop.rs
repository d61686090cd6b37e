// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversions between Monowerk raster types and the `image` crate buffers
// that decoders and rasterisers hand us.

use std::borrow::Cow;

use image::{DynamicImage, GrayImage, Luma, RgbImage};
use monowerk_core::error::Result;
use monowerk_core::{GrayscaleGrid, PackedBitPlane, PixelGrid};

/// Flatten any decoded image to 8-bit RGB samples. Alpha is discarded and
/// 16-bit or float channels are scaled down by the `image` crate. Images
/// that are already 8-bit RGB are read in place.
pub fn pixel_grid_from_dynamic(image: &DynamicImage) -> Result<PixelGrid> {
    let rgb: Cow<'_, RgbImage> = match image.as_rgb8() {
        Some(rgb) => Cow::Borrowed(rgb),
        None => Cow::Owned(image.to_rgb8()),
    };
    let (width, height) = rgb.dimensions();
    PixelGrid::from_interleaved(width, height, rgb.as_raw(), 3)
}

/// Wrap an existing 8-bit luma image as a grayscale grid, bypassing the
/// luminance reducer.
pub fn grayscale_from_luma(image: &GrayImage) -> Result<GrayscaleGrid> {
    let (width, height) = image.dimensions();
    GrayscaleGrid::new(width, height, image.as_raw().clone())
}

/// Copy a grayscale grid into a `GrayImage` for use with `image`/`imageproc`.
pub fn grayscale_to_luma(gray: &GrayscaleGrid) -> GrayImage {
    let mut image = GrayImage::new(gray.width(), gray.height());
    // A grid always holds exactly width * height samples.
    image.copy_from_slice(gray.as_slice());
    image
}

/// Expand a packed plane to a black (0) / white (255) luma image, e.g. for
/// on-screen previews or codecs without a 1-bit mode.
pub fn expand_to_luma(plane: &PackedBitPlane) -> GrayImage {
    GrayImage::from_fn(plane.width(), plane.height(), |x, y| {
        let white = plane.is_white(x, y).unwrap_or(true);
        Luma([if white { 255 } else { 0 }])
    })
}
