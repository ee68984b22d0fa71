// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{EngineKind, PreprocessProfile, VisionOptions};

/// Persistent application settings.
///
/// Every field has a default, so a partial JSON file is valid: missing keys
/// take the values from [`AppConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Engine used when none is given on the command line.
    pub engine: EngineKind,
    /// Language code handed to the engine (`en`, `eng`, `de`, ...).
    pub language: String,
    /// Filter chain applied before recognition.
    pub preprocess: PreprocessProfile,
    /// Longest allowed image side in pixels; larger images are downscaled.
    pub max_side: u32,
    /// Try all four rotations and keep the most readable one.
    pub auto_rotate: bool,
    /// Write preprocessed and rotated intermediates next to the text output.
    pub save_images: bool,
    /// Apply whitespace collapsing and common OCR fix-ups to the output text.
    pub postprocess_text: bool,
    /// Upper bound for a single external conversion run.
    pub conversion_timeout_secs: u64,
    /// Upper bound for a single external OCR run (tesseract, easyocr, paddleocr).
    pub ocr_timeout_secs: u64,
    pub tesseract: TesseractSettings,
    pub easyocr: CommandSettings,
    pub paddleocr: CommandSettings,
    pub vision: VisionOptions,
    /// Custom-word domains merged into the vision vocabulary.
    pub custom_word_domains: Vec<String>,
    /// Directory holding the `ocrs` detection and recognition models.
    pub ocrs_model_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Tesseract,
            language: "eng".into(),
            preprocess: PreprocessProfile::Standard,
            max_side: 4000,
            auto_rotate: true,
            save_images: false,
            postprocess_text: false,
            conversion_timeout_secs: 30,
            ocr_timeout_secs: 120,
            tesseract: TesseractSettings::default(),
            easyocr: CommandSettings::easyocr(),
            paddleocr: CommandSettings::paddleocr(),
            vision: VisionOptions::default(),
            custom_word_domains: Vec::new(),
            ocrs_model_dir: None,
        }
    }
}

impl AppConfig {
    /// Parse a JSON config document.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Tesseract invocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractSettings {
    /// Program name or absolute path of the `tesseract` binary.
    pub program: String,
    /// OCR engine mode (`--oem`).
    pub oem: u8,
    /// Page segmentation modes tried in order; the best-scoring result wins.
    pub psm_modes: Vec<u8>,
    /// Blur and adaptive-threshold the image before handing it to tesseract.
    pub internal_preprocess: bool,
}

impl Default for TesseractSettings {
    fn default() -> Self {
        Self {
            program: "tesseract".into(),
            oem: 3,
            psm_modes: vec![6, 3, 13, 8, 10, 11],
            internal_preprocess: true,
        }
    }
}

/// How the stdout of an external OCR command is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Every non-empty stdout line is a line of recognised text.
    Lines,
    /// PaddleOCR result lines: `[[box...], ('text', 0.98)]`.
    PaddleTuples,
}

/// An external OCR program driven through an argument template.
///
/// `{input}` is replaced with the path of a temporary PNG and `{lang}` with
/// the configured language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSettings {
    pub program: String,
    pub args: Vec<String>,
    pub output: OutputFormat,
}

impl CommandSettings {
    /// EasyOCR's CLI with detail level 0 prints one recognised string per line.
    pub fn easyocr() -> Self {
        Self {
            program: "easyocr".into(),
            args: ["-l", "{lang}", "-f", "{input}", "--detail", "0"]
                .into_iter()
                .map(String::from)
                .collect(),
            output: OutputFormat::Lines,
        }
    }

    pub fn paddleocr() -> Self {
        Self {
            program: "paddleocr".into(),
            args: ["--image_dir", "{input}", "--lang", "{lang}", "--use_angle_cls", "false"]
                .into_iter()
                .map(String::from)
                .collect(),
            output: OutputFormat::PaddleTuples,
        }
    }
}
