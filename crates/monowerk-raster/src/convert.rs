// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bilevel conversion pipeline — decoded page image in, bit-depth-1 PNG out.
//
// Chains the luminance reducer, the threshold binarizer, and the PNG
// boundary adapter around a decoded `DynamicImage`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::DynamicImage;
use monowerk_core::error::{MonowerkError, Result};
use monowerk_core::{BinarizationConfig, ConversionConfig, GrayscaleGrid, PackedBitPlane, PixelGrid};
use tracing::{debug, info, instrument};

use crate::binarize::binarize;
use crate::encode::png::{encode_png, write_png};
use crate::interop::pixel_grid_from_dynamic;
use crate::luminance::reduce;
use crate::threshold::suggest_threshold;

/// Converts one rendered page to a 1-bit raster.
///
/// ```ignore
/// let config = ConversionConfig::load("monowerk.json")?;
/// BilevelConverter::open("page-1.png")?.save_png("page-1.bw.png", &config)?;
/// ```
pub struct BilevelConverter {
    /// The rendered page as decoded.
    image: DynamicImage,
}

impl BilevelConverter {
    // -- Construction ---------------------------------------------------------

    /// Decode a page image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            MonowerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = image.width(), height = image.height(), "Page image loaded");
        Ok(Self { image })
    }

    /// Decode a page image from encoded bytes (PNG, JPEG, TIFF, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data).map_err(|err| {
            MonowerkError::ImageError(format!("failed to decode page image: {}", err))
        })?;
        debug!(width = image.width(), height = image.height(), "Page image decoded from bytes");
        Ok(Self { image })
    }

    /// Wrap an image a rasteriser already produced.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Stages ---------------------------------------------------------------

    /// The page as 8-bit RGB samples.
    pub fn pixel_grid(&self) -> Result<PixelGrid> {
        pixel_grid_from_dynamic(&self.image)
    }

    /// The page reduced to fixed-point luminance.
    pub fn grayscale(&self) -> Result<GrayscaleGrid> {
        Ok(reduce(&self.pixel_grid()?))
    }

    /// Otsu's level for this page, as a starting point for a threshold.
    pub fn suggest_threshold(&self) -> Result<u8> {
        Ok(suggest_threshold(&self.grayscale()?))
    }

    /// Reduce and binarize the page. The configuration is validated before
    /// any pixel is touched.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn binarize(&self, config: &BinarizationConfig) -> Result<PackedBitPlane> {
        config.validate()?;
        let gray = self.grayscale()?;
        let plane = binarize(&gray, config)?;
        info!(
            white = plane.count_white(),
            packed_bytes = plane.len(),
            "Page binarized"
        );
        Ok(plane)
    }

    /// Binarize at the page's own Otsu level, reducing the page only once.
    /// Returns the configuration actually applied alongside the plane.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn binarize_auto(&self, invert: bool) -> Result<(BinarizationConfig, PackedBitPlane)> {
        let gray = self.grayscale()?;
        let level = suggest_threshold(&gray);
        let config = BinarizationConfig::new(i32::from(level), invert);
        let plane = binarize(&gray, &config)?;
        info!(threshold = level, packed_bytes = plane.len(), "Page binarized at Otsu level");
        Ok((config, plane))
    }

    // -- Output ---------------------------------------------------------------

    /// Binarize and encode as a bit-depth-1 PNG in memory.
    #[instrument(skip_all)]
    pub fn to_png_bytes(&self, config: &ConversionConfig) -> Result<Vec<u8>> {
        let plane = self.binarize(&config.binarization)?;
        encode_png(&plane, &config.png)
    }

    /// Binarize and write a bit-depth-1 PNG to `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_png(&self, path: impl AsRef<Path>, config: &ConversionConfig) -> Result<()> {
        let plane = self.binarize(&config.binarization)?;
        write_plane(&plane, path.as_ref(), config)
    }

    /// Like [`Self::save_png`], but the threshold comes from
    /// [`Self::binarize_auto`] instead of `config`. Returns the configuration
    /// that was applied.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_png_auto(
        &self,
        path: impl AsRef<Path>,
        config: &ConversionConfig,
    ) -> Result<BinarizationConfig> {
        let (applied, plane) = self.binarize_auto(config.binarization.invert)?;
        write_plane(&plane, path.as_ref(), config)?;
        Ok(applied)
    }
}

fn write_plane(plane: &PackedBitPlane, path: &Path, config: &ConversionConfig) -> Result<()> {
    let file = File::create(path)?;
    write_png(plane, &config.png, BufWriter::new(file))?;
    info!("1-bit PNG written");
    Ok(())
}
