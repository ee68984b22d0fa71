// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for heictext.

use thiserror::Error;

/// Top-level error type for all heictext operations.
#[derive(Debug, Error)]
pub enum HeicTextError {
    // -- Input / conversion errors --
    #[error("unsupported input file: {0}")]
    UnsupportedInput(String),

    #[error("HEIC conversion failed: {0}")]
    Conversion(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- OCR errors --
    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("unknown OCR engine: {0}")]
    UnknownEngine(String),

    #[error("required tool `{tool}` is not available: {detail}")]
    ToolMissing { tool: String, detail: String },

    #[error("`{tool}` timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

impl HeicTextError {
    /// Build a [`HeicTextError::ToolMissing`] for an external program.
    pub fn tool_missing(tool: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ToolMissing {
            tool: tool.into(),
            detail: detail.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HeicTextError>;
