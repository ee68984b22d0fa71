// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for targets without a native text recogniser.

use heictext_core::error::{HeicTextError, Result};
use heictext_core::types::VisionOptions;

use crate::traits::*;

/// Bridge returned on non-macOS platforms.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "stub"
    }
}

impl NativeTextRecognition for StubBridge {
    fn is_available(&self) -> bool {
        false
    }

    fn recognize_lines(&self, _png: &[u8], _options: &VisionOptions) -> Result<Vec<String>> {
        tracing::warn!("NativeTextRecognition::recognize_lines called on stub bridge");
        Err(HeicTextError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_reports_platform_unavailable() {
        let err = StubBridge
            .recognize_lines(&[], &VisionOptions::default())
            .unwrap_err();
        assert!(matches!(err, HeicTextError::PlatformUnavailable));
    }

    #[test]
    fn platform_bridge_is_the_stub() {
        let bridge = crate::platform_bridge();
        assert_eq!(bridge.platform_name(), "stub");
        assert!(!bridge.is_available());
    }
}
