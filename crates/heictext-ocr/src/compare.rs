// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-engine comparison and the comparison log.

use std::fmt::Write as _;

use chrono::{DateTime, Local};
use heictext_core::types::PreprocessProfile;
use image::DynamicImage;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::engine::TextExtractor;
use crate::orientation::find_orientation;
use crate::quality::TextQuality;

/// Outcome of one engine on one image.
#[derive(Debug, Clone, Serialize)]
pub struct EngineRun {
    pub engine: String,
    pub text: String,
    pub total_chars: usize,
    /// Alphanumeric or whitespace characters.
    pub meaningful_chars: usize,
    pub words: usize,
    pub lines: usize,
    /// Length-normalised quality, comparable across engines.
    pub quality_score: f64,
    pub success: bool,
    pub error: Option<String>,
}

impl EngineRun {
    pub fn from_text(engine: &str, text: String) -> Self {
        Self {
            engine: engine.to_string(),
            total_chars: text.chars().count(),
            meaningful_chars: text
                .chars()
                .filter(|c| c.is_alphanumeric() || c.is_whitespace())
                .count(),
            words: text.split_whitespace().count(),
            lines: text.lines().filter(|line| !line.trim().is_empty()).count(),
            quality_score: TextQuality::assess(&text).normalized(),
            text,
            success: true,
            error: None,
        }
    }

    pub fn failed(engine: &str, error: String) -> Self {
        Self {
            engine: engine.to_string(),
            text: String::new(),
            total_chars: 0,
            meaningful_chars: 0,
            words: 0,
            lines: 0,
            quality_score: 0.0,
            success: false,
            error: Some(error),
        }
    }
}

/// Run every engine on `image`. With `auto_rotate` each engine gets its own
/// orientation search. Failures are recorded in the run, never returned.
#[instrument(skip_all, fields(engines = engines.len(), auto_rotate = auto_rotate))]
pub fn compare_engines(
    image: &DynamicImage,
    engines: &[Box<dyn TextExtractor>],
    auto_rotate: bool,
) -> Vec<EngineRun> {
    engines
        .iter()
        .map(|engine| {
            let outcome = if auto_rotate {
                find_orientation(image, engine.as_ref()).map(|report| report.best_text)
            } else {
                engine.extract_text(image)
            };
            let run = match outcome {
                Ok(text) => EngineRun::from_text(engine.name(), text),
                Err(err) => {
                    warn!(engine = engine.name(), error = %err, "Engine failed during comparison");
                    EngineRun::failed(engine.name(), err.to_string())
                }
            };
            info!(
                engine = %run.engine,
                meaningful = run.meaningful_chars,
                words = run.words,
                lines = run.lines,
                quality = run.quality_score,
                "Engine compared"
            );
            run
        })
        .collect()
}

/// Pairwise difference, always `first - second`.
#[derive(Debug, Clone, Serialize)]
pub struct EngineDifference {
    pub first: String,
    pub second: String,
    pub meaningful_chars_diff: i64,
    pub words_diff: i64,
    pub lines_diff: i64,
    pub quality_diff: f64,
    /// `first` only when its quality is strictly higher.
    pub winner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonAnalysis {
    pub best_engine: Option<String>,
    pub differences: Vec<EngineDifference>,
    pub total_engines: usize,
    pub successful_engines: usize,
    /// Spread between the best and worst successful quality scores.
    pub performance_gap: f64,
}

impl ComparisonAnalysis {
    /// The run of the best engine, if any scored above zero.
    pub fn best_run<'a>(&self, runs: &'a [EngineRun]) -> Option<&'a EngineRun> {
        let best = self.best_engine.as_deref()?;
        runs.iter().find(|run| run.engine == best)
    }
}

fn signed(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

pub fn analyze(runs: &[EngineRun]) -> ComparisonAnalysis {
    let mut best_engine = None;
    let mut best_quality = 0.0;
    for run in runs.iter().filter(|run| run.success) {
        if run.quality_score > best_quality {
            best_quality = run.quality_score;
            best_engine = Some(run.engine.clone());
        }
    }

    let mut differences = Vec::new();
    for (index, first) in runs.iter().enumerate() {
        for second in &runs[index + 1..] {
            if !(first.success && second.success) {
                continue;
            }
            let winner = if first.quality_score > second.quality_score {
                &first.engine
            } else {
                &second.engine
            };
            differences.push(EngineDifference {
                first: first.engine.clone(),
                second: second.engine.clone(),
                meaningful_chars_diff: signed(first.meaningful_chars) - signed(second.meaningful_chars),
                words_diff: signed(first.words) - signed(second.words),
                lines_diff: signed(first.lines) - signed(second.lines),
                quality_diff: first.quality_score - second.quality_score,
                winner: winner.clone(),
            });
        }
    }

    let successful: Vec<f64> = runs
        .iter()
        .filter(|run| run.success)
        .map(|run| run.quality_score)
        .collect();
    let performance_gap = match (
        successful.iter().copied().reduce(f64::max),
        successful.iter().copied().reduce(f64::min),
    ) {
        (Some(max), Some(min)) => max - min,
        _ => 0.0,
    };

    ComparisonAnalysis {
        best_engine,
        differences,
        total_engines: runs.len(),
        successful_engines: successful.len(),
        performance_gap,
    }
}

/// Everything written to `<stem>_comparison.log`.
pub struct ComparisonLog<'a> {
    pub file_name: &'a str,
    pub timestamp: DateTime<Local>,
    pub auto_rotate: bool,
    pub preprocess: PreprocessProfile,
    pub runs: &'a [EngineRun],
    pub analysis: &'a ComparisonAnalysis,
}

fn enabled(flag: bool) -> &'static str {
    if flag { "Enabled" } else { "Disabled" }
}

impl ComparisonLog<'_> {
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "OCR Engine Comparison Results")?;
        writeln!(out, "File: {}", self.file_name)?;
        writeln!(out, "Date: {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(out, "Auto-rotation: {}", enabled(self.auto_rotate))?;
        writeln!(out, "Image preprocessing: {}", self.preprocess)?;
        writeln!(out, "\n{}\n", "=".repeat(50))?;

        for run in self.runs {
            writeln!(out, "{} Results:", run.engine.to_uppercase())?;
            writeln!(out, "  Success: {}", run.success)?;
            writeln!(out, "  Total characters: {}", run.total_chars)?;
            writeln!(out, "  Meaningful characters: {}", run.meaningful_chars)?;
            writeln!(out, "  Words: {}", run.words)?;
            writeln!(out, "  Lines: {}", run.lines)?;
            writeln!(out, "  Quality score: {:.1}", run.quality_score)?;
            if !run.success {
                writeln!(out, "  Error: {}", run.error.as_deref().unwrap_or("Unknown error"))?;
            }
            writeln!(out)?;
        }

        writeln!(out, "Analysis:")?;
        writeln!(out, "  Best engine: {}", self.analysis.best_engine.as_deref().unwrap_or("none"))?;
        writeln!(
            out,
            "  Successful engines: {}/{}",
            self.analysis.successful_engines, self.analysis.total_engines
        )?;
        writeln!(out, "  Quality gap: {:.1} points", self.analysis.performance_gap)?;
        writeln!(out)?;

        for diff in &self.analysis.differences {
            writeln!(out, "{} vs {}:", diff.first.to_uppercase(), diff.second.to_uppercase())?;
            writeln!(out, "  Character difference: {:+}", diff.meaningful_chars_diff)?;
            writeln!(out, "  Word difference: {:+}", diff.words_diff)?;
            writeln!(out, "  Line difference: {:+}", diff.lines_diff)?;
            writeln!(out, "  Quality difference: {:+.1}", diff.quality_diff)?;
            writeln!(out, "  Winner: {}", diff.winner)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heictext_core::error::{HeicTextError, Result};
    use image::{GrayImage, Luma};

    struct Fixed(&'static str, Option<&'static str>);

    impl TextExtractor for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn extract_text(&self, _image: &DynamicImage) -> Result<String> {
            self.1
                .map(String::from)
                .ok_or_else(|| HeicTextError::OcrError("engine crashed".into()))
        }
    }

    fn blank() -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([255u8])))
    }

    fn sample_runs() -> Vec<EngineRun> {
        let engines: Vec<Box<dyn TextExtractor>> = vec![
            Box::new(Fixed("easyocr", Some("resource aws_instance web\nami = x"))),
            Box::new(Fixed("paddleocr", Some("r e s"))),
            Box::new(Fixed("tesseract", None)),
        ];
        compare_engines(&blank(), &engines, false)
    }

    #[test]
    fn run_counts() {
        let run = EngineRun::from_text("x", "ab 12\n\n c!".into());
        assert_eq!(run.total_chars, 10);
        assert_eq!(run.meaningful_chars, 9);
        assert_eq!(run.words, 3);
        assert_eq!(run.lines, 2);
    }

    #[test]
    fn failures_are_recorded() {
        let runs = sample_runs();
        assert_eq!(runs.len(), 3);
        assert!(!runs[2].success);
        assert_eq!(runs[2].error.as_deref(), Some("OCR failed: engine crashed"));
    }

    #[test]
    fn engine_failing_every_rotation_is_not_a_success() {
        let engines: Vec<Box<dyn TextExtractor>> = vec![
            Box::new(Fixed("easyocr", Some("resource aws_instance web"))),
            Box::new(Fixed("tesseract", None)),
        ];
        let runs = compare_engines(&blank(), &engines, true);
        assert!(runs[0].success);
        assert!(!runs[1].success);
        assert_eq!(runs[1].error.as_deref(), Some("OCR failed: engine crashed"));

        let analysis = analyze(&runs);
        assert_eq!(analysis.successful_engines, 1);
        assert_eq!(analysis.best_engine.as_deref(), Some("easyocr"));
    }

    #[test]
    fn analysis_picks_best_and_skips_failed_pairs() {
        let runs = sample_runs();
        let analysis = analyze(&runs);
        assert_eq!(analysis.best_engine.as_deref(), Some("easyocr"));
        assert_eq!(analysis.best_run(&runs).map(|run| run.engine.as_str()), Some("easyocr"));
        assert_eq!(analysis.total_engines, 3);
        assert_eq!(analysis.successful_engines, 2);
        assert_eq!(analysis.differences.len(), 1);
        let diff = &analysis.differences[0];
        assert_eq!(diff.winner, "easyocr");
        assert!(diff.quality_diff > 0.0);
        assert!((analysis.performance_gap - diff.quality_diff).abs() < 1e-9);
    }

    #[test]
    fn equal_quality_gives_pair_to_second_engine() {
        let runs = vec![
            EngineRun::from_text("a", "same words".into()),
            EngineRun::from_text("b", "same words".into()),
        ];
        let analysis = analyze(&runs);
        assert_eq!(analysis.best_engine.as_deref(), Some("a"));
        assert_eq!(analysis.differences[0].winner, "b");
    }

    #[test]
    fn no_positive_quality_means_no_best_engine() {
        let runs = vec![EngineRun::from_text("a", String::new()), EngineRun::failed("b", "boom".into())];
        let analysis = analyze(&runs);
        assert_eq!(analysis.best_engine, None);
        assert_eq!(analysis.performance_gap, 0.0);
    }

    #[test]
    fn log_layout() {
        let runs = sample_runs();
        let analysis = analyze(&runs);
        let log = ComparisonLog {
            file_name: "IMG_0001.HEIC",
            timestamp: Local::now(),
            auto_rotate: true,
            preprocess: PreprocessProfile::Standard,
            runs: &runs,
            analysis: &analysis,
        }
        .render();
        assert!(log.starts_with("OCR Engine Comparison Results\nFile: IMG_0001.HEIC\n"));
        assert!(log.contains("Auto-rotation: Enabled"));
        assert!(log.contains("EASYOCR Results:\n  Success: true"));
        assert!(log.contains("  Error: OCR failed: engine crashed"));
        assert!(log.contains("Best engine: easyocr"));
        assert!(log.contains("EASYOCR vs PADDLEOCR:"));
        assert!(log.contains("  Winner: easyocr"));
    }
}
