// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// heictext-bridge: native text recognition behind a platform-neutral trait.
//
// macOS gets Apple's Vision framework through objc2. Every other target gets
// a stub that reports `PlatformUnavailable`, so the rest of the workspace
// builds and tests anywhere.

pub mod traits;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(not(target_os = "macos"))]
pub mod stub;

pub use traits::{NativeTextRecognition, PlatformBridge};

/// The bridge implementation for the target operating system.
pub fn platform_bridge() -> Box<dyn PlatformBridge> {
    #[cfg(target_os = "macos")]
    {
        Box::new(macos::VisionBridge::new())
    }
    #[cfg(not(target_os = "macos"))]
    {
        Box::new(stub::StubBridge)
    }
}
