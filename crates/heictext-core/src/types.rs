// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: OCR engines, rotations, preprocessing profiles, and the
// native vision request options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HeicTextError;

/// OCR backends that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Platform vision framework (Apple Vision on macOS).
    Vision,
    /// EasyOCR, driven through its command-line entry point.
    #[serde(rename = "easyocr", alias = "easy_ocr")]
    EasyOcr,
    /// Tesseract, driven through the `tesseract` binary.
    Tesseract,
    /// PaddleOCR, driven through its command-line entry point.
    #[serde(rename = "paddleocr", alias = "paddle_ocr")]
    PaddleOcr,
    /// In-process `ocrs` neural engine (requires the `ocrs` feature).
    Ocrs,
}

impl EngineKind {
    /// Every engine, in dispatch-table order.
    pub const ALL: [EngineKind; 5] = [
        Self::Vision,
        Self::EasyOcr,
        Self::Tesseract,
        Self::PaddleOcr,
        Self::Ocrs,
    ];

    /// Canonical lowercase name used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vision => "vision",
            Self::EasyOcr => "easyocr",
            Self::Tesseract => "tesseract",
            Self::PaddleOcr => "paddleocr",
            Self::Ocrs => "ocrs",
        }
    }

    /// Whether the engine honours custom-word vocabularies.
    pub fn supports_custom_words(&self) -> bool {
        matches!(self, Self::Vision)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = HeicTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "vision" | "apple_vision" => Ok(Self::Vision),
            "easyocr" | "easy_ocr" => Ok(Self::EasyOcr),
            "tesseract" => Ok(Self::Tesseract),
            "paddleocr" | "paddle_ocr" | "paddle" => Ok(Self::PaddleOcr),
            "ocrs" => Ok(Self::Ocrs),
            _ => Err(HeicTextError::UnknownEngine(s.to_string())),
        }
    }
}

/// Clockwise quarter-turn applied to an image before recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// All four cardinal rotations in ascending order.
    pub const ALL: [Rotation; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    pub fn degrees(&self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Map a degree value (any multiple of 90, negative allowed) to a rotation.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// The rotation that undoes this one.
    pub fn inverse(&self) -> Self {
        match self {
            Self::Deg0 => Self::Deg0,
            Self::Deg90 => Self::Deg270,
            Self::Deg180 => Self::Deg180,
            Self::Deg270 => Self::Deg90,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Named preprocessing filter chains, from lightest to heaviest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreprocessProfile {
    /// Leave the image untouched (apart from the size cap).
    None,
    /// Grayscale and adaptive gaussian threshold only.
    Gentle,
    /// Grayscale, invert, adaptive gaussian threshold, morphological clean.
    #[default]
    Standard,
    /// Grayscale, invert, Otsu threshold, close + open.
    Aggressive,
}

impl PreprocessProfile {
    pub const ALL: [PreprocessProfile; 4] =
        [Self::None, Self::Gentle, Self::Standard, Self::Aggressive];

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gentle => "gentle",
            Self::Standard => "standard",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for PreprocessProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PreprocessProfile {
    type Err = HeicTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "gentle" => Ok(Self::Gentle),
            "standard" => Ok(Self::Standard),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(HeicTextError::Config(format!(
                "unknown preprocessing profile `{other}` (expected none, gentle, standard, aggressive)"
            ))),
        }
    }
}

/// Speed/accuracy trade-off of the native vision recogniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionLevel {
    #[default]
    Fast,
    Accurate,
}

impl RecognitionLevel {
    pub const ALL: [RecognitionLevel; 2] = [Self::Fast, Self::Accurate];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Accurate => "accurate",
        }
    }
}

impl fmt::Display for RecognitionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecognitionLevel {
    type Err = HeicTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" | "0" => Ok(Self::Fast),
            "accurate" | "1" => Ok(Self::Accurate),
            other => Err(HeicTextError::Config(format!(
                "unknown recognition level `{other}` (expected fast, accurate)"
            ))),
        }
    }
}

/// Options for a native vision text-recognition request.
///
/// Defaults are the values that scored best on the infrastructure-document
/// corpus: fast recognition, no language correction, a 2% minimum text
/// height, and automatic language detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionOptions {
    pub recognition_level: RecognitionLevel,
    pub uses_language_correction: bool,
    /// Minimum text height as a fraction of image height (0.0 disables).
    pub minimum_text_height: f32,
    pub automatically_detects_language: bool,
    /// BCP-47 language codes; ignored when auto-detection is on.
    pub recognition_languages: Vec<String>,
    /// Vocabulary hints passed to the recogniser.
    pub custom_words: Vec<String>,
}

impl Default for VisionOptions {
    fn default() -> Self {
        Self {
            recognition_level: RecognitionLevel::Fast,
            uses_language_correction: false,
            minimum_text_height: 0.02,
            automatically_detects_language: true,
            recognition_languages: Vec::new(),
            custom_words: Vec::new(),
        }
    }
}
