// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR engine abstraction and name-based dispatch.

pub mod command;
#[cfg(feature = "ocrs")]
pub mod ocrs;
pub mod tesseract;
pub mod vision;

use std::time::Duration;

use heictext_core::config::AppConfig;
use heictext_core::error::Result;
use heictext_core::types::EngineKind;
use image::DynamicImage;
use tracing::info;

pub use command::CommandEngine;
pub use tesseract::TesseractEngine;
pub use vision::VisionEngine;

/// Anything that turns an image into text.
pub trait TextExtractor {
    /// Short engine name used in logs and reports.
    fn name(&self) -> &str;

    /// Recognise the text in `image`. No text is `Ok(String::new())`, not an
    /// error.
    fn extract_text(&self, image: &DynamicImage) -> Result<String>;
}

/// Construct the engine for `kind` from `config`.
///
/// Engines backed by an external program check that it is installed here, so
/// a missing tool fails before any image is processed.
pub fn build_engine(kind: EngineKind, config: &AppConfig) -> Result<Box<dyn TextExtractor>> {
    let timeout = Duration::from_secs(config.ocr_timeout_secs);
    let engine: Box<dyn TextExtractor> = match kind {
        EngineKind::Tesseract => Box::new(TesseractEngine::new(
            config.tesseract.clone(),
            &config.language,
            timeout,
        )?),
        EngineKind::EasyOcr => Box::new(CommandEngine::new(
            "easyocr",
            config.easyocr.clone(),
            &config.language,
            timeout,
        )),
        EngineKind::PaddleOcr => Box::new(CommandEngine::new(
            "paddleocr",
            config.paddleocr.clone(),
            &config.language,
            timeout,
        )),
        EngineKind::Vision => Box::new(VisionEngine::from_config(config)?),
        EngineKind::Ocrs => build_ocrs(config)?,
    };
    info!(engine = %kind, language = %config.language, "OCR engine ready");
    Ok(engine)
}

#[cfg(feature = "ocrs")]
fn build_ocrs(config: &AppConfig) -> Result<Box<dyn TextExtractor>> {
    Ok(Box::new(ocrs::OcrsExtractor::from_config(config)?))
}

#[cfg(not(feature = "ocrs"))]
fn build_ocrs(_config: &AppConfig) -> Result<Box<dyn TextExtractor>> {
    Err(heictext_core::error::HeicTextError::PlatformUnavailable)
}
