// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Monowerk.

use thiserror::Error;

/// Top-level error type for all Monowerk operations.
#[derive(Debug, Error)]
pub enum MonowerkError {
    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Raster geometry --
    #[error("dimension mismatch: expected {expected} samples, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("raster must be at least 1x1, got {width}x{height}")]
    EmptyRaster { width: u32, height: u32 },

    #[error("unsupported sample layout: {0}")]
    UnsupportedLayout(String),

    // -- Codec boundary --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PNG encoding failed: {0}")]
    EncodeError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MonowerkError>;
