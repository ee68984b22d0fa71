// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// heictext-document: image handling for the heictext OCR pipeline.
//
// Provides HEIC→PNG conversion through OS utilities, an image processor
// (rotate, resize, grayscale, invert), and the preprocessing filter chain
// (adaptive/Otsu thresholding, morphological cleanup) that runs before OCR.

pub mod convert;
pub mod image;
pub mod process;
pub mod scan;

// Re-export the primary structs so callers can use `heictext_document::ImageProcessor` etc.
pub use convert::{HeicConverter, load_source};
pub use crate::image::processor::ImageProcessor;
pub use scan::enhance::ScanEnhancer;

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrsEngine;
