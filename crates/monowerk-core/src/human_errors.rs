// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for operators at the label printer.
//
// Every technical error is mapped to plain English with a clear suggestion.

use std::io::ErrorKind;

use crate::error::MonowerkError;

/// Severity of an error from the operator's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operator must change a setting or an input and run again.
    ActionRequired,
    /// The input itself can't be handled — retrying won't help.
    Permanent,
    /// The environment got in the way (disk, permissions); worth another try.
    Transient,
}

impl Severity {
    /// Process exit status for the CLI, distinct per severity.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ActionRequired => 2,
            Self::Permanent => 3,
            Self::Transient => 4,
        }
    }

    /// Short tag printed in front of the message.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ActionRequired => "action required",
            Self::Permanent => "cannot convert",
            Self::Transient => "temporary failure",
        }
    }
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (first line of CLI output).
    pub message: String,
    /// What the operator should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `MonowerkError` into a `HumanError` for terminal output.
pub fn humanize_error(err: &MonowerkError) -> HumanError {
    match err {
        MonowerkError::InvalidConfig(detail) => HumanError {
            message: "The conversion settings aren't valid.".into(),
            suggestion: format!("Pick a threshold between 0 and 255. ({detail})"),
            severity: Severity::ActionRequired,
        },

        MonowerkError::DimensionMismatch { expected, actual } => HumanError {
            message: "The page image is the wrong size for its declared dimensions.".into(),
            suggestion: format!(
                "The rasteriser produced {actual} samples but {expected} were expected. Re-render the page."
            ),
            severity: Severity::Permanent,
        },

        MonowerkError::EmptyRaster { width, height } => HumanError {
            message: "The page image is empty.".into(),
            suggestion: format!("Got a {width}x{height} image. Check that the page rendered at all."),
            severity: Severity::Permanent,
        },

        MonowerkError::UnsupportedLayout(detail) => HumanError {
            message: "The page image uses a pixel layout we can't read.".into(),
            suggestion: format!("Export the page as 8-bit RGB or RGBA. ({detail})"),
            severity: Severity::Permanent,
        },

        MonowerkError::ImageError(detail) => HumanError {
            message: "We couldn't read the input image.".into(),
            suggestion: format!("Make sure the file is a PNG, JPEG, TIFF, or similar image. ({detail})"),
            severity: Severity::Permanent,
        },

        MonowerkError::EncodeError(detail) => HumanError {
            message: "Writing the black-and-white PNG failed.".into(),
            suggestion: format!("Try a different output location. ({detail})"),
            severity: Severity::Transient,
        },

        MonowerkError::Io(io_err) => humanize_io_error(io_err),

        MonowerkError::Serialization(detail) => HumanError {
            message: "The configuration file isn't valid JSON.".into(),
            suggestion: format!("Fix the file or remove it to use the defaults. ({detail})"),
            severity: Severity::ActionRequired,
        },
    }
}

fn humanize_io_error(err: &std::io::Error) -> HumanError {
    match err.kind() {
        ErrorKind::NotFound => HumanError {
            message: "A file we need isn't there.".into(),
            suggestion: format!("Check the file name and folder. ({err})"),
            severity: Severity::ActionRequired,
        },
        ErrorKind::PermissionDenied => HumanError {
            message: "We aren't allowed to open that file.".into(),
            suggestion: format!("Check the file permissions. ({err})"),
            severity: Severity::ActionRequired,
        },
        _ => HumanError {
            message: "Reading or writing a file failed.".into(),
            suggestion: format!("Try again. If this keeps happening, check free disk space. ({err})"),
            severity: Severity::Transient,
        },
    }
}
