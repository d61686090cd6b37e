// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core raster types: source pixel grids, grayscale grids, and packed 1-bit
// planes. All of them are created fresh per image and owned by the caller.

use serde::{Deserialize, Serialize};

use crate::error::{MonowerkError, Result};

/// One source pixel. Alpha, if the source has it, is dropped on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelSample {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl PixelSample {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// A neutral gray sample with all three channels set to `level`.
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }
}

/// Reject zero-sized rasters and return the pixel count.
fn checked_area(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(MonowerkError::EmptyRaster { width, height });
    }
    Ok(width as usize * height as usize)
}

// -- PixelGrid ----------------------------------------------------------------

/// A rectangular, row-major grid of source pixels as produced by a page
/// rasteriser or image decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<PixelSample>,
}

impl PixelGrid {
    /// Build a grid from row-major samples. `pixels.len()` must equal
    /// `width * height` and both dimensions must be non-zero.
    pub fn new(width: u32, height: u32, pixels: Vec<PixelSample>) -> Result<Self> {
        let expected = checked_area(width, height)?;
        if pixels.len() != expected {
            return Err(MonowerkError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A grid filled with a single sample.
    pub fn filled(width: u32, height: u32, sample: PixelSample) -> Result<Self> {
        let area = checked_area(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![sample; area],
        })
    }

    /// Build a grid from interleaved 8-bit RGB (`channels == 3`) or RGBA
    /// (`channels == 4`) bytes.
    pub fn from_interleaved(width: u32, height: u32, bytes: &[u8], channels: usize) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(MonowerkError::UnsupportedLayout(format!(
                "expected 3 (RGB) or 4 (RGBA) channels per pixel, got {channels}"
            )));
        }
        let area = checked_area(width, height)?;
        let expected = area * channels;
        if bytes.len() != expected {
            return Err(MonowerkError::DimensionMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(channels)
            .map(|px| PixelSample::new(px[0], px[1], px[2]))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All samples in row-major order.
    pub fn as_slice(&self) -> &[PixelSample] {
        &self.pixels
    }

    /// Sample at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<PixelSample> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, PixelSample> {
        self.pixels.chunks_exact(self.width as usize)
    }
}

// -- GrayscaleGrid ------------------------------------------------------------

/// One 8-bit intensity per source pixel, row-major. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl GrayscaleGrid {
    /// Wrap row-major intensities, checking them against the declared
    /// dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = checked_area(width, height)?;
        if data.len() != expected {
            return Err(MonowerkError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid matching `source` in size. `fill` receives the source
    /// samples and a zeroed output buffer of the same length, and must write
    /// every intensity.
    pub fn derive_from<F>(source: &PixelGrid, fill: F) -> Self
    where
        F: FnOnce(&[PixelSample], &mut [u8]),
    {
        let mut data = vec![0u8; source.pixels.len()];
        fill(&source.pixels, &mut data);
        Self {
            width: source.width,
            height: source.height,
            data,
        }
    }

    /// A grid with every intensity set to `level`.
    pub fn filled(width: u32, height: u32, level: u8) -> Result<Self> {
        let area = checked_area(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![level; area],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.width as usize)
    }
}

// -- PackedBitPlane -----------------------------------------------------------

/// Bit meaning inside a packed plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// 1 = white, 0 = black. The internal convention of every packed plane
    /// produced by the binarizer.
    WhiteIsOne,
    /// 1 = black (ink), 0 = white. What thermal printers and some indexed
    /// palettes expect.
    BlackIsOne,
}

/// Number of bytes in one packed row of `width` pixels.
pub const fn packed_stride(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Mask selecting the pixel-carrying bits of the last byte in a row.
const fn last_byte_mask(width: u32) -> u8 {
    match width % 8 {
        0 => 0xFF,
        used => 0xFFu8 << (8 - used),
    }
}

/// A row-aligned, MSB-first 1-bit raster. Each row occupies
/// [`packed_stride`] bytes and the unused low bits of the final byte of each
/// row are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitPlane {
    width: u32,
    height: u32,
    polarity: Polarity,
    data: Vec<u8>,
}

impl PackedBitPlane {
    /// Wrap already-packed rows. The buffer length must be
    /// `packed_stride(width) * height` and the row padding bits must be zero.
    pub fn from_packed(width: u32, height: u32, polarity: Polarity, data: Vec<u8>) -> Result<Self> {
        checked_area(width, height)?;
        let stride = packed_stride(width);
        let expected = stride * height as usize;
        if data.len() != expected {
            return Err(MonowerkError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }

        let padding = !last_byte_mask(width);
        if padding != 0 {
            if let Some(row) = data
                .chunks_exact(stride)
                .position(|row| row[stride - 1] & padding != 0)
            {
                return Err(MonowerkError::UnsupportedLayout(format!(
                    "row {row} has non-zero padding bits"
                )));
            }
        }

        Ok(Self {
            width,
            height,
            polarity,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per packed row.
    pub fn stride(&self) -> usize {
        packed_stride(self.width)
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Total buffer length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Packed bytes of row `y`.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.stride())
    }

    /// Raw bit value at `(x, y)`, interpreted according to [`Self::polarity`].
    pub fn bit(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.width {
            return None;
        }
        let byte = self.row(y)?[x as usize / 8];
        Some(byte & (0x80 >> (x % 8)) != 0)
    }

    /// Whether pixel `(x, y)` is white, regardless of the stored polarity.
    pub fn is_white(&self, x: u32, y: u32) -> Option<bool> {
        let bit = self.bit(x, y)?;
        Some(match self.polarity {
            Polarity::WhiteIsOne => bit,
            Polarity::BlackIsOne => !bit,
        })
    }

    /// Re-express the plane in `target` polarity. Pixel bits are flipped when
    /// the polarity changes; row padding stays zero either way.
    pub fn to_polarity(&self, target: Polarity) -> Self {
        if target == self.polarity {
            return self.clone();
        }

        let stride = self.stride();
        let last_mask = last_byte_mask(self.width);
        let mut data = self.data.clone();
        for row in data.chunks_exact_mut(stride) {
            if let Some((last, body)) = row.split_last_mut() {
                for byte in body {
                    *byte = !*byte;
                }
                *last ^= last_mask;
            }
        }

        Self {
            width: self.width,
            height: self.height,
            polarity: target,
            data,
        }
    }

    /// Number of pixels classified white.
    pub fn count_white(&self) -> u64 {
        let ones: u64 = self.data.iter().map(|b| b.count_ones() as u64).sum();
        match self.polarity {
            Polarity::WhiteIsOne => ones,
            Polarity::BlackIsOne => self.width as u64 * self.height as u64 - ones,
        }
    }
}
