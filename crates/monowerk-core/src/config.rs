// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion configuration: the binarization policy plus PNG output options.
// Loaded from JSON; every field falls back to its default when omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MonowerkError, Result};
use crate::types::Polarity;

/// Threshold used when the caller does not pick one.
pub const DEFAULT_THRESHOLD: i32 = 128;

/// Pixel classification policy handed to the binarizer.
///
/// `threshold` is the highest intensity (inclusive) classified as black when
/// `invert` is false. With `invert` set, that range becomes white instead.
/// The field is a plain integer so that out-of-range values coming from
/// configuration files or flags are reported, not silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinarizationConfig {
    pub threshold: i32,
    pub invert: bool,
}

impl BinarizationConfig {
    pub fn new(threshold: i32, invert: bool) -> Self {
        Self { threshold, invert }
    }

    /// Check the threshold range and return it as a sample value.
    pub fn validate(&self) -> Result<u8> {
        u8::try_from(self.threshold).map_err(|_| {
            MonowerkError::InvalidConfig(format!(
                "threshold must be within 0..=255, got {}",
                self.threshold
            ))
        })
    }
}

impl Default for BinarizationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            invert: false,
        }
    }
}

/// PNG colour type used for the 1-bit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PngColorTarget {
    /// Grayscale at bit depth 1: 0 is black, 1 is white.
    Grayscale,
    /// Two-entry palette. With `black_index_zero` the palette is
    /// `[black, white]`; otherwise `[white, black]`.
    Indexed { black_index_zero: bool },
}

impl PngColorTarget {
    /// Bit meaning the encoder expects for this colour type.
    pub fn expected_polarity(&self) -> Polarity {
        match self {
            Self::Grayscale => Polarity::WhiteIsOne,
            Self::Indexed {
                black_index_zero: true,
            } => Polarity::WhiteIsOne,
            Self::Indexed {
                black_index_zero: false,
            } => Polarity::BlackIsOne,
        }
    }
}

/// Deflate effort for the PNG writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PngCompression {
    Fast,
    Default,
    Best,
}

/// Options for the PNG boundary adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PngOptions {
    pub target: PngColorTarget,
    pub compression: PngCompression,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            target: PngColorTarget::Grayscale,
            compression: PngCompression::Default,
        }
    }
}

/// Full settings for one page conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub binarization: BinarizationConfig,
    pub png: PngOptions,
}

impl ConversionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.binarization.validate().map(|_| ())
    }
}
