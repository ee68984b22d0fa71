// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// macOS text recognition through Vision.framework via objc2.
//
// A `VNRecognizeTextRequest` is configured from `VisionOptions` and performed
// synchronously by a `VNImageRequestHandler` built from the PNG bytes. Each
// `VNRecognizedTextObservation` contributes its top candidate as one line.
//
// Vision's request API is thread-safe and blocking, so unlike UIKit calls this
// needs no main-thread marker. All message sends run inside an autorelease
// pool so the observation objects are released per call.

#![cfg(target_os = "macos")]

use objc2::rc::{Allocated, Retained, autoreleasepool};
use objc2::runtime::{AnyObject, Bool};
use objc2::{msg_send, sel};
use objc2_foundation::{NSArray, NSData, NSDictionary, NSError, NSString};

use heictext_core::error::{HeicTextError, Result};
use heictext_core::types::{RecognitionLevel, VisionOptions};

use crate::traits::*;

// Vision.framework is not wrapped by objc2-foundation; link it so the class
// lookups below resolve.
#[link(name = "Vision", kind = "framework")]
unsafe extern "C" {}

/// `VNRequestTextRecognitionLevel` raw values.
const RECOGNITION_LEVEL_ACCURATE: isize = 0;
const RECOGNITION_LEVEL_FAST: isize = 1;

/// Vision-backed bridge.
pub struct VisionBridge;

impl VisionBridge {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VisionBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for VisionBridge {
    fn platform_name(&self) -> &str {
        "macOS (Vision)"
    }
}

fn ns_string_array(values: &[String]) -> Retained<NSArray<NSString>> {
    let strings: Vec<Retained<NSString>> = values.iter().map(|v| NSString::from_str(v)).collect();
    NSArray::from_retained_slice(&strings)
}

/// Build and configure a `VNRecognizeTextRequest`.
fn text_request(options: &VisionOptions) -> Result<Retained<AnyObject>> {
    // SAFETY: `new` on a known NSObject subclass; returns +1 or nil.
    let request: Option<Retained<AnyObject>> =
        unsafe { msg_send![objc2::class!(VNRecognizeTextRequest), new] };
    let request =
        request.ok_or_else(|| HeicTextError::Bridge("VNRecognizeTextRequest init failed".into()))?;

    let level = match options.recognition_level {
        RecognitionLevel::Fast => RECOGNITION_LEVEL_FAST,
        RecognitionLevel::Accurate => RECOGNITION_LEVEL_ACCURATE,
    };

    // SAFETY: property setters declared on VNRecognizeTextRequest (macOS 10.15+).
    // Argument types match the Objective-C declarations: NSInteger, BOOL,
    // float, NSArray<NSString *> *.
    unsafe {
        let _: () = msg_send![&request, setRecognitionLevel: level];
        let _: () = msg_send![
            &request,
            setUsesLanguageCorrection: Bool::new(options.uses_language_correction)
        ];
        let _: () = msg_send![&request, setMinimumTextHeight: options.minimum_text_height];

        // automaticallyDetectsLanguage arrived in macOS 13.
        let can_auto_detect: Bool = msg_send![
            &request,
            respondsToSelector: sel!(setAutomaticallyDetectsLanguage:)
        ];
        if can_auto_detect.as_bool() {
            let _: () = msg_send![
                &request,
                setAutomaticallyDetectsLanguage: Bool::new(options.automatically_detects_language)
            ];
        }

        if !options.recognition_languages.is_empty() {
            let languages = ns_string_array(&options.recognition_languages);
            let _: () = msg_send![&request, setRecognitionLanguages: &*languages];
        }
        if !options.custom_words.is_empty() {
            let words = ns_string_array(&options.custom_words);
            let _: () = msg_send![&request, setCustomWords: &*words];
        }
    }

    Ok(request)
}

/// Top candidate string of every observation on a performed request.
fn observation_lines(request: &AnyObject) -> Vec<String> {
    // SAFETY: `results` is NSArray<VNRecognizedTextObservation *> * or nil;
    // `topCandidates:` returns NSArray<VNRecognizedText *> *; `string` is NSString *.
    unsafe {
        let results: Option<Retained<NSArray<AnyObject>>> = msg_send![request, results];
        let Some(results) = results else {
            return Vec::new();
        };

        let count: usize = msg_send![&results, count];
        let mut lines = Vec::with_capacity(count);
        for index in 0..count {
            let observation: Retained<AnyObject> = msg_send![&results, objectAtIndex: index];
            let candidates: Retained<NSArray<AnyObject>> =
                msg_send![&observation, topCandidates: 1usize];
            let top: Option<Retained<AnyObject>> = msg_send![&candidates, firstObject];
            if let Some(top) = top {
                let text: Retained<NSString> = msg_send![&top, string];
                lines.push(text.to_string());
            }
        }
        lines
    }
}

impl NativeTextRecognition for VisionBridge {
    fn is_available(&self) -> bool {
        true
    }

    fn recognize_lines(&self, png: &[u8], options: &VisionOptions) -> Result<Vec<String>> {
        tracing::debug!(
            bytes = png.len(),
            level = ?options.recognition_level,
            custom_words = options.custom_words.len(),
            "Vision: recognising text"
        );

        autoreleasepool(|_| {
            let request = text_request(options)?;
            let data = NSData::with_bytes(png);
            let handler_options = NSDictionary::<NSString, AnyObject>::new();

            // SAFETY: alloc + initWithData:options: on VNImageRequestHandler;
            // the handler copies what it needs from `data`.
            let handler: Option<Retained<AnyObject>> = unsafe {
                let alloc: Allocated<AnyObject> =
                    msg_send![objc2::class!(VNImageRequestHandler), alloc];
                msg_send![alloc, initWithData: &*data, options: &*handler_options]
            };
            let handler = handler
                .ok_or_else(|| HeicTextError::Bridge("VNImageRequestHandler init failed".into()))?;

            let requests = NSArray::from_retained_slice(&[request.clone()]);
            // SAFETY: performRequests:error: returns BOOL with an NSError out
            // parameter, mapped by objc2 to Result.
            let performed: std::result::Result<(), Retained<NSError>> =
                unsafe { msg_send![&handler, performRequests: &*requests, error: _] };
            performed.map_err(|err| {
                HeicTextError::Bridge(format!(
                    "Vision request failed: {}",
                    err.localizedDescription()
                ))
            })?;

            let lines = observation_lines(&request);
            tracing::info!(lines = lines.len(), "Vision: recognition complete");
            Ok(lines)
        })
    }
}
