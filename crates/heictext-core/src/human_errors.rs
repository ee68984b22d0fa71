// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity decides whether the batch loop keeps going.

use crate::error::HeicTextError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Affects one file only; the rest of the batch can proceed.
    PerFile,
    /// The user must install something or fix their setup.
    ActionRequired,
    /// Cannot be fixed by retrying, e.g. wrong format or unsupported platform.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `HeicTextError` into a `HumanError`.
pub fn humanize_error(err: &HeicTextError) -> HumanError {
    match err {
        HeicTextError::UnsupportedInput(detail) => HumanError {
            message: "This file can't be read as a photo.".into(),
            suggestion: format!(
                "Pass HEIC/HEIF, PNG, JPEG or TIFF files, or a directory containing them. ({detail})"
            ),
            severity: Severity::PerFile,
        },

        HeicTextError::Conversion(_) => HumanError {
            message: "The HEIC photo could not be converted to PNG.".into(),
            suggestion: "The file may be damaged. Try opening it in an image viewer, or export it as PNG/JPEG first.".into(),
            severity: Severity::PerFile,
        },

        HeicTextError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::PerFile,
        },

        HeicTextError::OcrError(_) => HumanError {
            message: "Text recognition didn't work on this photo.".into(),
            suggestion: "Try another engine (--engine), a different preprocessing profile (--preprocess), or retake the photo with better lighting.".into(),
            severity: Severity::PerFile,
        },

        HeicTextError::UnknownEngine(name) => HumanError {
            message: format!("`{name}` is not an OCR engine heictext knows."),
            suggestion: "Use one of: vision, easyocr, tesseract, paddleocr, ocrs.".into(),
            severity: Severity::Permanent,
        },

        HeicTextError::ToolMissing { tool, .. } => humanize_missing_tool(tool),

        HeicTextError::Timeout { tool, seconds } => HumanError {
            message: format!("`{tool}` took longer than {seconds} seconds."),
            suggestion: "Raise `conversion_timeout_secs` in the config file, or try a smaller image.".into(),
            severity: Severity::PerFile,
        },

        HeicTextError::Config(detail) => HumanError {
            message: "The configuration is not valid.".into(),
            suggestion: format!("Check the config file (`heictext config path`). ({detail})"),
            severity: Severity::ActionRequired,
        },

        HeicTextError::Io(e) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check that the paths exist and that you have permission to use them. ({e})"),
            severity: Severity::PerFile,
        },

        HeicTextError::Serialization(_) => HumanError {
            message: "A settings or report file is not valid JSON.".into(),
            suggestion: "Delete or fix the file, then run `heictext config init` to write fresh defaults.".into(),
            severity: Severity::ActionRequired,
        },

        HeicTextError::Bridge(_) => HumanError {
            message: "The system text recogniser reported an error.".into(),
            suggestion: "Try again, or pick another engine with --engine.".into(),
            severity: Severity::PerFile,
        },

        HeicTextError::PlatformUnavailable => HumanError {
            message: "This engine isn't available on this computer.".into(),
            suggestion: "The vision engine needs macOS; the ocrs engine needs a build with the `ocrs` feature. Pick another engine with --engine.".into(),
            severity: Severity::Permanent,
        },
    }
}

fn humanize_missing_tool(tool: &str) -> HumanError {
    let suggestion = match tool {
        "tesseract" => "Install Tesseract (e.g. `brew install tesseract` or `apt install tesseract-ocr`) and make sure it is on PATH.".to_string(),
        "easyocr" => "Install EasyOCR with `pip install easyocr` so the `easyocr` command is on PATH.".to_string(),
        "paddleocr" => "Install PaddleOCR with `pip install paddleocr` so the `paddleocr` command is on PATH.".to_string(),
        "sips" | "heif-convert" | "magick" => "Install a HEIC converter: macOS ships `sips`; on Linux install libheif (`heif-convert`) or ImageMagick (`magick`).".to_string(),
        other => format!("Install `{other}` or point the config file at its location."),
    };
    HumanError {
        message: format!("`{tool}` is needed but could not be found."),
        suggestion,
        severity: Severity::ActionRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tesseract_is_action_required() {
        let err = HeicTextError::tool_missing("tesseract", "No such file or directory");
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("tesseract-ocr"));
    }

    #[test]
    fn unknown_engine_lists_choices() {
        let human = humanize_error(&HeicTextError::UnknownEngine("invalid".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("paddleocr"));
    }

    #[test]
    fn ocr_failure_is_per_file() {
        let human = humanize_error(&HeicTextError::OcrError("empty page".into()));
        assert_eq!(human.severity, Severity::PerFile);
    }

    #[test]
    fn missing_converter_mentions_libheif() {
        let human = humanize_error(&HeicTextError::tool_missing("heif-convert", "not found"));
        assert!(human.suggestion.contains("libheif"));
    }
}
