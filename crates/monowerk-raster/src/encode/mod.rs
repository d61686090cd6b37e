// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encode module — container writers for packed 1-bit planes.

pub mod png;

pub use self::png::{encode_png, write_png};
