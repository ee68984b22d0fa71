// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract through its command-line binary.
//
// The PNG is streamed on stdin and the text read from stdout
// (`tesseract stdin stdout --oem N --psm M -l LANG`). Several page
// segmentation modes are tried and the most readable result is kept.

use std::time::Duration;

use heictext_core::config::TesseractSettings;
use heictext_core::error::{HeicTextError, Result};
use heictext_document::image::processor::encode_png;
use heictext_document::process::run_tool;
use heictext_document::scan::{AdaptiveMethod, ScanEnhancer};
use image::DynamicImage;
use tracing::{debug, info, instrument, warn};

use super::TextExtractor;
use crate::quality::quality_score;

const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Modes retried on the unprocessed image when the preprocessed one yields
/// nothing.
const FALLBACK_MODES: usize = 3;

pub struct TesseractEngine {
    settings: TesseractSettings,
    language: String,
    timeout: Duration,
    version: String,
}

impl TesseractEngine {
    /// Run `tesseract --version`; a binary that is missing or does not run
    /// is reported as [`HeicTextError::ToolMissing`].
    #[instrument(skip(settings), fields(program = %settings.program))]
    pub fn new(settings: TesseractSettings, language: &str, timeout: Duration) -> Result<Self> {
        let check = run_tool(&settings.program, ["--version"], None, VERSION_CHECK_TIMEOUT)?;
        if !check.success() {
            return Err(HeicTextError::tool_missing(
                settings.program.clone(),
                format!("`--version` failed: {}", check.stderr_lossy()),
            ));
        }
        // Older releases print the banner on stderr.
        let banner = check.stdout_lossy();
        let version = banner
            .lines()
            .chain(check.stderr_lossy().lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("tesseract")
            .to_string();
        info!(%version, "Tesseract found");

        Ok(Self {
            settings,
            language: language.to_string(),
            timeout,
            version,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn args(&self, psm: u8) -> Vec<String> {
        vec![
            "stdin".into(),
            "stdout".into(),
            "--oem".into(),
            self.settings.oem.to_string(),
            "--psm".into(),
            psm.to_string(),
            "-l".into(),
            self.language.clone(),
        ]
    }

    fn run_mode(&self, png: &[u8], psm: u8) -> Result<String> {
        let output = run_tool(&self.settings.program, self.args(psm), Some(png.to_vec()), self.timeout)?;
        if !output.success() {
            return Err(HeicTextError::OcrError(format!(
                "tesseract --psm {psm} exited with {:?}: {}",
                output.status.code(),
                output.stderr_lossy()
            )));
        }
        Ok(output.stdout_lossy().trim().to_string())
    }

    /// Run every mode in `modes` and keep the best-scoring non-empty text.
    ///
    /// Failing modes are skipped; the error surfaces only when every mode
    /// failed.
    fn sweep(&self, png: &[u8], modes: &[u8]) -> Result<Option<String>> {
        let mut last_error = None;
        let mut outputs = Vec::with_capacity(modes.len());
        for &psm in modes {
            match self.run_mode(png, psm) {
                Ok(text) => outputs.push((psm, text)),
                Err(err) => {
                    warn!(psm, error = %err, "Tesseract mode failed");
                    last_error = Some(err);
                }
            }
        }
        if outputs.is_empty() {
            if let Some(err) = last_error {
                return Err(err);
            }
        }
        Ok(pick_best(outputs).map(|(_, text)| text))
    }

    fn prepare(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        if !self.settings.internal_preprocess {
            return encode_png(image);
        }
        let processed = ScanEnhancer::from_dynamic(image.clone())
            .grayscale()
            .gaussian_denoise(0.8)
            .adaptive_threshold(11, 2, AdaptiveMethod::Gaussian)
            .into_dynamic();
        encode_png(&processed)
    }
}

/// Highest quality score among non-empty outputs; the first wins a tie.
fn pick_best(outputs: Vec<(u8, String)>) -> Option<(u8, String)> {
    let mut best: Option<(f64, u8, String)> = None;
    for (psm, text) in outputs {
        if text.is_empty() {
            continue;
        }
        let score = quality_score(&text);
        debug!(psm, score, chars = text.len(), "Tesseract candidate");
        if best.as_ref().is_none_or(|(best_score, _, _)| score > *best_score) {
            best = Some((score, psm, text));
        }
    }
    best.map(|(_, psm, text)| (psm, text))
}

impl TextExtractor for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn extract_text(&self, image: &DynamicImage) -> Result<String> {
        let prepared = self.prepare(image)?;
        if let Some(text) = self.sweep(&prepared, &self.settings.psm_modes)? {
            return Ok(text);
        }

        debug!("No text after preprocessing; retrying on the original image");
        let original = encode_png(image)?;
        let fallback: Vec<u8> = self
            .settings
            .psm_modes
            .iter()
            .copied()
            .take(FALLBACK_MODES)
            .collect();
        Ok(self.sweep(&original, &fallback)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outputs_are_ignored() {
        assert_eq!(pick_best(vec![(6, String::new()), (3, String::new())]), None);
    }

    #[test]
    fn most_readable_output_wins() {
        let outputs = vec![
            (6, "|| ≈ °".to_string()),
            (3, "resource aws_instance web".to_string()),
            (13, "r e s".to_string()),
        ];
        assert_eq!(pick_best(outputs).map(|(psm, _)| psm), Some(3));
    }

    #[test]
    fn first_of_equal_scores_wins() {
        let outputs = vec![(6, "same text here".to_string()), (3, "same text here".to_string())];
        assert_eq!(pick_best(outputs).map(|(psm, _)| psm), Some(6));
    }

    #[test]
    fn missing_binary_is_tool_missing() {
        let settings = TesseractSettings {
            program: "heictext-no-such-tesseract".into(),
            ..TesseractSettings::default()
        };
        let err = TesseractEngine::new(settings, "eng", Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, HeicTextError::ToolMissing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn arguments_follow_cli_contract() {
        // `true --version` exits 0, standing in for the binary.
        let settings = TesseractSettings {
            program: "true".into(),
            ..TesseractSettings::default()
        };
        let engine = TesseractEngine::new(settings, "deu", Duration::from_secs(5)).unwrap();
        assert_eq!(
            engine.args(6),
            ["stdin", "stdout", "--oem", "3", "--psm", "6", "-l", "deu"]
        );
        assert!(!engine.version().is_empty());
    }
}
