// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process recognition with the `ocrs` models (feature `ocrs`).

use heictext_core::config::AppConfig;
use heictext_core::error::Result;
use heictext_document::scan::ocr::{OcrsConfig, OcrsEngine};
use image::DynamicImage;

use super::TextExtractor;

pub struct OcrsExtractor {
    engine: OcrsEngine,
}

impl OcrsExtractor {
    /// Load models from `config.ocrs_model_dir`, or the ocrs cache directory.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let model_config = match &config.ocrs_model_dir {
            Some(dir) => OcrsConfig::from_dir(dir),
            None => OcrsConfig::default(),
        };
        Ok(Self {
            engine: OcrsEngine::new(model_config)?,
        })
    }
}

impl TextExtractor for OcrsExtractor {
    fn name(&self) -> &str {
        "ocrs"
    }

    fn extract_text(&self, image: &DynamicImage) -> Result<String> {
        self.engine.recognize_text(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_models_fail_construction() {
        let mut config = AppConfig::default();
        config.ocrs_model_dir = Some("/nonexistent/ocrs-models".into());
        assert!(OcrsExtractor::from_config(&config).is_err());
    }
}
