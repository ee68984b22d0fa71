// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// heictext-ocr: OCR engine dispatch, orientation search, text-quality scoring,
// multi-engine comparison and the photo-to-text pipeline. Image work is
// delegated to `heictext-document`; the native recogniser lives in
// `heictext-bridge`.

pub mod compare;
pub mod engine;
pub mod orientation;
pub mod pipeline;
pub mod quality;
pub mod similarity;
pub mod sweep;
pub mod text;
pub mod words;

pub use compare::{ComparisonAnalysis, ComparisonLog, EngineRun, analyze, compare_engines};
pub use engine::{TextExtractor, build_engine};
pub use orientation::{OrientationReport, find_orientation};
pub use pipeline::{BatchSummary, FileOutcome, Pipeline, collect_inputs};
pub use quality::{TextQuality, alphanumeric_count, quality_score};
pub use similarity::{SimilarityMetrics, text_similarity};
pub use sweep::{SweepGrid, SweepReport, VisionAxes, run_sweep};
