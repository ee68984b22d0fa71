// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: thresholding and cleanup filters that prepare photos
// for recognition, plus the optional in-process `ocrs` engine.

pub mod enhance;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use enhance::{AdaptiveMethod, ScanEnhancer};

#[cfg(feature = "ocr")]
pub use ocr::OcrsEngine;
