// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reading-orientation search over the four quarter-turns.

use heictext_core::error::Result;
use heictext_core::types::Rotation;
use heictext_document::ImageProcessor;
use image::DynamicImage;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::engine::TextExtractor;
use crate::quality::alphanumeric_count;

/// Result of recognising one rotation.
#[derive(Debug, Clone, Serialize)]
pub struct OrientationCandidate {
    pub rotation: Rotation,
    pub text: String,
    pub alphanumeric: usize,
    /// Set when extraction failed; the candidate then scores 0.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrientationReport {
    /// Clockwise turn that makes the text upright.
    pub best: Rotation,
    /// Text recognised at `best`.
    pub best_text: String,
    /// One entry per rotation, in `Rotation::ALL` order.
    pub candidates: Vec<OrientationCandidate>,
}

impl OrientationReport {
    pub fn best_score(&self) -> usize {
        self.candidates
            .iter()
            .find(|candidate| candidate.rotation == self.best)
            .map(|candidate| candidate.alphanumeric)
            .unwrap_or(0)
    }
}

/// Rotate `image` by each quarter-turn, extract once per rotation, and keep
/// the rotation with the most alphanumeric characters.
///
/// Only a strictly greater count replaces the current best, so ties go to the
/// earlier rotation and an all-zero search reports 0°. A failed rotation scores
/// 0; when every rotation fails the last error is returned.
#[instrument(skip_all, fields(engine = extractor.name(), width = image.width(), height = image.height()))]
pub fn find_orientation(image: &DynamicImage, extractor: &dyn TextExtractor) -> Result<OrientationReport> {
    let mut candidates = Vec::with_capacity(Rotation::ALL.len());
    let mut best_index = 0;
    let mut last_error = None;

    for rotation in Rotation::ALL {
        let rotated = ImageProcessor::from_dynamic(image.clone())
            .rotate(rotation)
            .into_dynamic();
        let candidate = match extractor.extract_text(&rotated) {
            Ok(text) => OrientationCandidate {
                rotation,
                alphanumeric: alphanumeric_count(&text),
                text,
                error: None,
            },
            Err(err) => {
                warn!(%rotation, error = %err, "Extraction failed for rotation");
                let candidate = OrientationCandidate {
                    rotation,
                    text: String::new(),
                    alphanumeric: 0,
                    error: Some(err.to_string()),
                };
                last_error = Some(err);
                candidate
            }
        };
        info!(%rotation, alphanumeric = candidate.alphanumeric, "Orientation candidate");

        if candidate.alphanumeric > candidates.get(best_index).map_or(0, |best: &OrientationCandidate| best.alphanumeric) {
            best_index = candidates.len();
        }
        candidates.push(candidate);
    }

    if candidates.iter().all(|candidate| candidate.error.is_some()) {
        if let Some(err) = last_error {
            warn!(engine = extractor.name(), "Extraction failed at every rotation");
            return Err(err);
        }
    }

    let best = &candidates[best_index];
    info!(best = %best.rotation, alphanumeric = best.alphanumeric, "Orientation chosen");
    Ok(OrientationReport {
        best: best.rotation,
        best_text: best.text.clone(),
        candidates,
    })
}
