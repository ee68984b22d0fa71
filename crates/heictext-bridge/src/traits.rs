// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use heictext_core::error::Result;
use heictext_core::types::VisionOptions;

/// Every native capability a platform provides.
pub trait PlatformBridge: NativeTextRecognition + Send + Sync {
    /// Human-readable platform name (e.g. "macOS (Vision)").
    fn platform_name(&self) -> &str;
}

/// Text recognition provided by the operating system.
pub trait NativeTextRecognition {
    /// Whether this platform has a recogniser at all.
    fn is_available(&self) -> bool;

    /// Recognise text in an encoded image (PNG).
    ///
    /// Returns one string per detected text line, in the order the platform
    /// reports them (top to bottom for Vision). An image without text yields
    /// an empty vector, not an error.
    fn recognize_lines(&self, png: &[u8], options: &VisionOptions) -> Result<Vec<String>>;
}
