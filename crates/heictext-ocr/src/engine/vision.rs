// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The platform's own text recogniser, reached through heictext-bridge.

use heictext_bridge::{PlatformBridge, platform_bridge};
use heictext_core::config::AppConfig;
use heictext_core::error::{HeicTextError, Result};
use heictext_core::types::VisionOptions;
use heictext_document::image::processor::encode_png;
use image::DynamicImage;
use tracing::{debug, instrument};

use super::TextExtractor;
use crate::words::{parse_domains, words_for_domains};

pub struct VisionEngine {
    bridge: Box<dyn PlatformBridge>,
    options: VisionOptions,
}

impl VisionEngine {
    /// Use `bridge` with `options` as given.
    pub fn with_bridge(bridge: Box<dyn PlatformBridge>, options: VisionOptions) -> Result<Self> {
        if !bridge.is_available() {
            return Err(HeicTextError::PlatformUnavailable);
        }
        Ok(Self { bridge, options })
    }

    /// The platform bridge with `config.vision`, extended by the vocabulary of
    /// `config.custom_word_domains`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut options = config.vision.clone();
        let domains = parse_domains(&config.custom_word_domains)?;
        for word in words_for_domains(&domains) {
            if !options.custom_words.contains(&word) {
                options.custom_words.push(word);
            }
        }
        Self::with_bridge(platform_bridge(), options)
    }

    pub fn options(&self) -> &VisionOptions {
        &self.options
    }
}

impl TextExtractor for VisionEngine {
    fn name(&self) -> &str {
        "vision"
    }

    #[instrument(skip_all, fields(platform = self.bridge.platform_name()))]
    fn extract_text(&self, image: &DynamicImage) -> Result<String> {
        let png = encode_png(image)?;
        let lines = self.bridge.recognize_lines(&png, &self.options)?;
        debug!(lines = lines.len(), "Vision lines received");
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heictext_bridge::NativeTextRecognition;
    use image::{GrayImage, Luma};

    /// Bridge that echoes how many custom words it was given.
    struct EchoBridge;

    impl PlatformBridge for EchoBridge {
        fn platform_name(&self) -> &str {
            "echo"
        }
    }

    impl NativeTextRecognition for EchoBridge {
        fn is_available(&self) -> bool {
            true
        }

        fn recognize_lines(&self, png: &[u8], options: &VisionOptions) -> Result<Vec<String>> {
            assert!(png.starts_with(b"\x89PNG"));
            Ok(vec!["first line".into(), format!("{} words", options.custom_words.len())])
        }
    }

    #[test]
    fn lines_are_joined() {
        let options = VisionOptions {
            custom_words: vec!["terraform".into(), "ansible".into()],
            ..VisionOptions::default()
        };
        let engine = VisionEngine::with_bridge(Box::new(EchoBridge), options).unwrap();
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([255u8])));
        assert_eq!(engine.extract_text(&image).unwrap(), "first line\n2 words");
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn stub_bridge_is_rejected() {
        assert!(matches!(
            VisionEngine::from_config(&AppConfig::default()),
            Err(HeicTextError::PlatformUnavailable)
        ));
    }

    #[test]
    fn unknown_domain_is_a_config_error() {
        let mut config = AppConfig::default();
        config.custom_word_domains = vec!["fortran".into()];
        assert!(matches!(VisionEngine::from_config(&config), Err(HeicTextError::Config(_))));
    }
}
