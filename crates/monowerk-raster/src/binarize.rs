// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Threshold binarizer and bit packer.
//
// Every intensity is split against one fixed threshold: at or below it is
// black, above it is white (swapped when `invert` is set). There is no
// nearest-palette search, so faint strokes stay black instead of rounding
// away to white. Bits are packed MSB-first, one row per `ceil(width / 8)`
// bytes, 1 = white.

use monowerk_core::error::{MonowerkError, Result};
use monowerk_core::{BinarizationConfig, GrayscaleGrid, PackedBitPlane, Polarity, packed_stride};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Whether `intensity` is classified white under the given rule.
#[inline]
pub fn is_white(intensity: u8, threshold: u8, invert: bool) -> bool {
    if invert {
        intensity <= threshold
    } else {
        intensity > threshold
    }
}

/// Binarize a grayscale grid and pack the result.
///
/// Fails with `InvalidConfig` when the threshold is outside 0..=255.
#[instrument(skip_all, fields(width = gray.width(), height = gray.height(), threshold = config.threshold, invert = config.invert))]
pub fn binarize(gray: &GrayscaleGrid, config: &BinarizationConfig) -> Result<PackedBitPlane> {
    binarize_samples(gray.width(), gray.height(), gray.as_slice(), config)
}

/// Binarize a bare row-major intensity buffer with declared dimensions.
///
/// The configuration is checked first, then the buffer length against
/// `width * height`; nothing is packed unless both pass.
pub fn binarize_samples(
    width: u32,
    height: u32,
    samples: &[u8],
    config: &BinarizationConfig,
) -> Result<PackedBitPlane> {
    let threshold = config.validate()?;
    let invert = config.invert;

    if width == 0 || height == 0 {
        return Err(MonowerkError::EmptyRaster { width, height });
    }
    let expected = width as usize * height as usize;
    if samples.len() != expected {
        return Err(MonowerkError::DimensionMismatch {
            expected,
            actual: samples.len(),
        });
    }

    let stride = packed_stride(width);
    let mut packed = vec![0u8; stride * height as usize];
    packed
        .par_chunks_mut(stride)
        .zip(samples.par_chunks(width as usize))
        .for_each(|(out_row, in_row)| pack_row(in_row, threshold, invert, out_row));

    debug!(packed_bytes = packed.len(), stride, "Bit packing complete");
    PackedBitPlane::from_packed(width, height, Polarity::WhiteIsOne, packed)
}

/// Pack one row of intensities into `out`. `out` must hold
/// `ceil(row.len() / 8)` bytes; bits past the last pixel stay zero.
fn pack_row(row: &[u8], threshold: u8, invert: bool, out: &mut [u8]) {
    for (byte, pixels) in out.iter_mut().zip(row.chunks(8)) {
        let mut acc = 0u8;
        for (bit, &intensity) in pixels.iter().enumerate() {
            if is_white(intensity, threshold, invert) {
                acc |= 0x80 >> bit;
            }
        }
        *byte = acc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monowerk_core::{PixelGrid, PixelSample};

    use crate::luminance::reduce;

    fn config(threshold: i32, invert: bool) -> BinarizationConfig {
        BinarizationConfig::new(threshold, invert)
    }

    /// Bit-at-a-time reference used to cross-check the parallel packer.
    fn reference_pack(gray: &GrayscaleGrid, threshold: u8, invert: bool) -> Vec<u8> {
        let stride = packed_stride(gray.width());
        let mut out = vec![0u8; stride * gray.height() as usize];
        for y in 0..gray.height() {
            for x in 0..gray.width() {
                let v = gray.get(x, y).unwrap();
                if is_white(v, threshold, invert) {
                    out[y as usize * stride + x as usize / 8] |= 1 << (7 - x % 8);
                }
            }
        }
        out
    }

    fn gradient(width: u32, height: u32) -> GrayscaleGrid {
        let data = (0..width * height)
            .map(|i| ((i * 37 + i / width * 11) % 256) as u8)
            .collect();
        GrayscaleGrid::new(width, height, data).unwrap()
    }

    #[test]
    fn black_then_white_pixel() {
        let pixels = PixelGrid::new(2, 1, vec![PixelSample::BLACK, PixelSample::WHITE]).unwrap();
        let gray = reduce(&pixels);
        assert_eq!(gray.as_slice(), &[0, 255]);

        let plane = binarize(&gray, &config(128, false)).unwrap();
        assert_eq!(plane.stride(), 1);
        assert_eq!(plane.as_bytes(), &[0b0100_0000]);
        assert_eq!(plane.polarity(), Polarity::WhiteIsOne);
    }

    #[test]
    fn all_white_sixteen_by_two() {
        let gray = GrayscaleGrid::filled(16, 2, 255).unwrap();
        let plane = binarize(&gray, &config(128, false)).unwrap();
        assert_eq!(plane.stride(), 2);
        assert_eq!(plane.len(), 4);
        assert!(plane.as_bytes().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn threshold_is_inclusive_for_black() {
        let gray = GrayscaleGrid::new(3, 1, vec![127, 128, 129]).unwrap();
        let plane = binarize(&gray, &config(128, false)).unwrap();
        assert_eq!(plane.as_bytes(), &[0b0010_0000]);
    }

    #[test]
    fn threshold_zero_blackens_only_zero() {
        let gray = GrayscaleGrid::new(4, 1, vec![0, 1, 128, 255]).unwrap();
        let plane = binarize(&gray, &config(0, false)).unwrap();
        assert_eq!(plane.as_bytes(), &[0b0111_0000]);
    }

    #[test]
    fn threshold_255_blackens_everything() {
        let gray = gradient(19, 5);
        let plane = binarize(&gray, &config(255, false)).unwrap();
        assert!(plane.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(plane.count_white(), 0);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let gray = GrayscaleGrid::filled(4, 4, 10).unwrap();
        for bad in [-1, 256, i32::MAX, i32::MIN] {
            let result = binarize(&gray, &config(bad, false));
            assert!(
                matches!(result, Err(MonowerkError::InvalidConfig(_))),
                "threshold {bad} should be rejected"
            );
        }
    }

    #[test]
    fn config_is_checked_before_dimensions() {
        let result = binarize_samples(4, 4, &[0; 3], &config(400, false));
        assert!(matches!(result, Err(MonowerkError::InvalidConfig(_))));
    }

    #[test]
    fn sample_count_mismatch_is_rejected() {
        let result = binarize_samples(4, 4, &[0; 15], &config(128, false));
        match result {
            Err(MonowerkError::DimensionMismatch { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn zero_sized_raster_is_rejected() {
        let result = binarize_samples(0, 3, &[], &config(128, false));
        assert!(matches!(result, Err(MonowerkError::EmptyRaster { .. })));
    }

    #[test]
    fn rows_are_byte_aligned_with_zero_padding() {
        for width in [1u32, 3, 7, 9, 13, 15, 17, 31] {
            // All-white input is the worst case for padding: every pixel bit is 1.
            let gray = GrayscaleGrid::filled(width, 3, 255).unwrap();
            let plane = binarize(&gray, &config(128, false)).unwrap();
            let stride = (width as usize).div_ceil(8);
            assert_eq!(plane.stride(), stride);
            assert_eq!(plane.len(), stride * 3);

            let used = width % 8;
            let padding_mask = 0xFFu8 >> used;
            for row in plane.rows() {
                assert_eq!(row[stride - 1] & padding_mask, 0, "width {width}");
                assert_eq!(row[stride - 1] | padding_mask, 0xFF, "width {width}");
            }
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let gray = gradient(333, 77);
        let first = binarize(&gray, &config(100, false)).unwrap();
        for _ in 0..5 {
            assert_eq!(binarize(&gray, &config(100, false)).unwrap(), first);
        }
    }

    #[test]
    fn parallel_packing_matches_reference() {
        let gray = gradient(1001, 64);
        for (threshold, invert) in [(0, false), (90, false), (200, true), (255, true)] {
            let plane = binarize(&gray, &config(threshold, invert)).unwrap();
            assert_eq!(
                plane.as_bytes(),
                reference_pack(&gray, threshold as u8, invert).as_slice(),
                "threshold {threshold}, invert {invert}"
            );
        }
    }

    #[test]
    fn invert_swaps_every_classification() {
        let gray = gradient(45, 9);
        for threshold in [0, 1, 64, 128, 200, 254, 255] {
            let normal = binarize(&gray, &config(threshold, false)).unwrap();
            let inverted = binarize(&gray, &config(threshold, true)).unwrap();
            for y in 0..gray.height() {
                for x in 0..gray.width() {
                    assert_ne!(
                        normal.is_white(x, y),
                        inverted.is_white(x, y),
                        "pixel ({x}, {y}) at threshold {threshold}"
                    );
                }
            }
            assert_eq!(normal.to_polarity(Polarity::BlackIsOne).as_bytes(), inverted.as_bytes());
        }
    }

    #[test]
    fn raising_threshold_never_whitens_a_pixel() {
        let gray = gradient(50, 6);
        let mut previous = binarize(&gray, &config(0, false)).unwrap();
        for threshold in 1..=255 {
            let current = binarize(&gray, &config(threshold, false)).unwrap();
            for y in 0..gray.height() {
                for x in 0..gray.width() {
                    if previous.is_white(x, y) == Some(false) {
                        assert_eq!(current.is_white(x, y), Some(false));
                    }
                }
            }
            previous = current;
        }
    }

    #[test]
    fn faint_mark_survives_a_high_threshold() {
        // Light gray hairline (200) on white paper: a nearest-of-two-colours
        // rule would drop it, a threshold of 220 keeps it.
        let mut data = vec![255u8; 8 * 3];
        for x in 0..8 {
            data[8 + x] = 200;
        }
        let gray = GrayscaleGrid::new(8, 3, data).unwrap();
        let plane = binarize(&gray, &config(220, false)).unwrap();
        assert_eq!(plane.as_bytes(), &[0xFF, 0x00, 0xFF]);
    }
}
