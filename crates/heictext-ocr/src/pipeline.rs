// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end photo → text pipeline and the sequential batch loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use heictext_core::config::AppConfig;
use heictext_core::error::{HeicTextError, Result};
use heictext_core::human_errors::{Severity, humanize_error};
use heictext_core::types::{EngineKind, PreprocessProfile, Rotation};
use heictext_document::convert::is_supported_path;
use heictext_document::{HeicConverter, ImageProcessor, ScanEnhancer, load_source};
use image::DynamicImage;
use tracing::{error, info, instrument, warn};

use crate::compare::{ComparisonLog, analyze, compare_engines};
use crate::engine::{TextExtractor, build_engine};
use crate::orientation::find_orientation;
use crate::text::postprocess_text;

/// Written instead of an empty text file.
pub const NO_TEXT_PLACEHOLDER: &str = "[No text detected]";

/// Written when comparison is on and no engine produced usable text.
pub const NO_ENGINE_PLACEHOLDER: &str = "[No engines succeeded]";

/// Stands in for an engine that could not be constructed, so the comparison
/// log still lists it as failed.
struct Unavailable {
    name: String,
    reason: String,
}

impl TextExtractor for Unavailable {
    fn name(&self) -> &str {
        &self.name
    }

    fn extract_text(&self, _image: &DynamicImage) -> Result<String> {
        Err(HeicTextError::OcrError(self.reason.clone()))
    }
}

/// Build every engine in `kinds`. Engines that fail to construct are kept as
/// always-failing entries.
pub fn comparison_engines(kinds: &[EngineKind], config: &AppConfig) -> Vec<Box<dyn TextExtractor>> {
    kinds
        .iter()
        .map(|&kind| match build_engine(kind, config) {
            Ok(engine) => engine,
            Err(err) => {
                warn!(engine = %kind, error = %err, "Engine unavailable for comparison");
                Box::new(Unavailable {
                    name: kind.name().to_string(),
                    reason: err.to_string(),
                }) as Box<dyn TextExtractor>
            }
        })
        .collect()
}

/// What happened to one input file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub text_path: PathBuf,
    /// Engine whose text was written, `none` when comparison found no winner.
    pub engine: String,
    /// Rotation chosen by the orientation search, when it ran.
    pub rotation: Option<Rotation>,
    pub text: String,
    pub comparison_log: Option<PathBuf>,
    pub saved_images: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<FileOutcome>,
    pub failed: Vec<(PathBuf, HeicTextError)>,
    /// Inputs not attempted after a failure that would repeat for every file.
    pub skipped: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

enum Recognition {
    Single(Box<dyn TextExtractor>),
    Compare(Vec<Box<dyn TextExtractor>>),
}

pub struct Pipeline {
    config: AppConfig,
    recognition: Recognition,
    converter: HeicConverter,
}

impl Pipeline {
    /// Pipeline using `config.engine`, constructed (and checked) up front.
    pub fn new(config: AppConfig) -> Result<Self> {
        let extractor = build_engine(config.engine, &config)?;
        Ok(Self::with_extractor(config, extractor))
    }

    pub fn with_extractor(config: AppConfig, extractor: Box<dyn TextExtractor>) -> Self {
        Self::build(config, Recognition::Single(extractor))
    }

    /// Pipeline that runs every engine in `engines` on each file, writes a
    /// comparison log and keeps the best engine's text.
    pub fn comparing(config: AppConfig, engines: Vec<Box<dyn TextExtractor>>) -> Self {
        Self::build(config, Recognition::Compare(engines))
    }

    fn build(config: AppConfig, recognition: Recognition) -> Self {
        let converter = HeicConverter::new(Duration::from_secs(config.conversion_timeout_secs));
        Self {
            config,
            recognition,
            converter,
        }
    }

    fn preprocess(&self, image: DynamicImage) -> DynamicImage {
        ScanEnhancer::from_dynamic(image)
            .apply_profile(self.config.preprocess, self.config.max_side)
            .into_dynamic()
    }

    /// Convert, preprocess, recognise and write `<stem>.txt` into `output_dir`.
    #[instrument(skip(self))]
    pub fn process_file(&self, input: &Path, output_dir: &Path) -> Result<FileOutcome> {
        let stem = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| HeicTextError::UnsupportedInput(input.display().to_string()))?
            .to_string();
        fs::create_dir_all(output_dir)?;

        let scratch = tempfile::tempdir()?;
        let source = load_source(input, scratch.path(), &self.converter)?;
        info!(width = source.width(), height = source.height(), "Source loaded");

        let mut saved_images = Vec::new();
        let prepared = self.preprocess(source);
        if self.config.save_images && self.config.preprocess != PreprocessProfile::None {
            let path = output_dir.join(format!("{stem}_preprocessed.png"));
            ImageProcessor::from_dynamic(prepared.clone()).save(&path)?;
            saved_images.push(path);
        }

        let mut rotation = None;
        let mut comparison_log = None;
        let (engine, text) = match &self.recognition {
            Recognition::Compare(engines) => {
                let runs = compare_engines(&prepared, engines, self.config.auto_rotate);
                let analysis = analyze(&runs);
                let file_name = input
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or(stem.as_str());
                let log = ComparisonLog {
                    file_name,
                    timestamp: Local::now(),
                    auto_rotate: self.config.auto_rotate,
                    preprocess: self.config.preprocess,
                    runs: &runs,
                    analysis: &analysis,
                };
                let log_path = output_dir.join(format!("{stem}_comparison.log"));
                fs::write(&log_path, log.render())?;
                comparison_log = Some(log_path);

                match analysis.best_run(&runs) {
                    Some(best) => (best.engine.clone(), best.text.clone()),
                    None => ("none".to_string(), NO_ENGINE_PLACEHOLDER.to_string()),
                }
            }
            Recognition::Single(extractor) if self.config.auto_rotate => {
                let report = find_orientation(&prepared, extractor.as_ref())?;
                if self.config.save_images && report.best != Rotation::Deg0 {
                    let path = output_dir.join(format!("{stem}_rotated_{}deg.png", report.best.degrees()));
                    ImageProcessor::from_dynamic(prepared).rotate(report.best).save(&path)?;
                    saved_images.push(path);
                }
                rotation = Some(report.best);
                (extractor.name().to_string(), report.best_text)
            }
            Recognition::Single(extractor) => {
                (extractor.name().to_string(), extractor.extract_text(&prepared)?)
            }
        };

        let text = if self.config.postprocess_text {
            postprocess_text(&text)
        } else {
            text
        };
        let text = if text.trim().is_empty() {
            warn!(file = %input.display(), "No text found");
            NO_TEXT_PLACEHOLDER.to_string()
        } else {
            text
        };

        let text_path = output_dir.join(format!("{stem}.txt"));
        fs::write(&text_path, &text)?;
        info!(path = %text_path.display(), %engine, chars = text.chars().count(), "Text written");

        Ok(FileOutcome {
            input: input.to_path_buf(),
            text_path,
            engine,
            rotation,
            text,
            comparison_log,
            saved_images,
        })
    }

    /// Process `inputs` one after another. A per-file failure is recorded and
    /// the loop moves on; a failure that needs user action (a missing tool, an
    /// unavailable engine) stops the batch and the rest are skipped.
    #[instrument(skip_all, fields(files = inputs.len()))]
    pub fn run_batch(&self, inputs: &[PathBuf], output_dir: &Path) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for (index, input) in inputs.iter().enumerate() {
            info!(file = %input.display(), "[{}/{}] Processing", index + 1, inputs.len());
            match self.process_file(input, output_dir) {
                Ok(outcome) => summary.succeeded.push(outcome),
                Err(err) => {
                    error!(file = %input.display(), error = %err, "File failed");
                    let severity = humanize_error(&err).severity;
                    summary.failed.push((input.clone(), err));
                    if severity != Severity::PerFile {
                        warn!(?severity, remaining = inputs.len() - index - 1, "Stopping batch");
                        summary.skipped.extend(inputs[index + 1..].iter().cloned());
                        break;
                    }
                }
            }
        }
        info!(
            succeeded = summary.succeeded.len(),
            failed = summary.failed.len(),
            skipped = summary.skipped.len(),
            "Batch complete"
        );
        summary
    }
}

/// Expand `paths` into the supported image files they name. Directories are
/// walked recursively and their files sorted; explicit files are kept in the
/// order given. Unsupported or missing paths are skipped with a warning.
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            let mut found = Vec::new();
            walk(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else if path.is_file() && is_supported_path(path) {
            files.push(path.to_path_buf());
        } else if path.is_file() {
            warn!(path = %path.display(), "Not a supported image, skipping");
        } else {
            warn!(path = %path.display(), "Not a file or directory, skipping");
        }
    }
    Ok(files)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, found)?;
        } else if is_supported_path(&path) {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    struct Fixed(&'static str);

    impl TextExtractor for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract_text(&self, _image: &DynamicImage) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct NoPlatform;

    impl TextExtractor for NoPlatform {
        fn name(&self) -> &str {
            "vision"
        }

        fn extract_text(&self, _image: &DynamicImage) -> Result<String> {
            Err(HeicTextError::PlatformUnavailable)
        }
    }

    fn write_png(path: &Path) {
        GrayImage::from_pixel(24, 16, Luma([255u8])).save(path).unwrap();
    }

    fn quiet_config() -> AppConfig {
        AppConfig {
            auto_rotate: false,
            preprocess: PreprocessProfile::None,
            ..AppConfig::default()
        }
    }

    #[test]
    fn writes_text_file_named_after_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("IMG_0001.png");
        write_png(&input);
        let out = dir.path().join("out");

        let pipeline = Pipeline::with_extractor(quiet_config(), Box::new(Fixed("terraform plan")));
        let outcome = pipeline.process_file(&input, &out).unwrap();

        assert_eq!(outcome.text_path, out.join("IMG_0001.txt"));
        assert_eq!(fs::read_to_string(&outcome.text_path).unwrap(), "terraform plan");
        assert_eq!(outcome.engine, "fixed");
        assert_eq!(outcome.rotation, None);
    }

    #[test]
    fn empty_text_gets_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blank.png");
        write_png(&input);

        let pipeline = Pipeline::with_extractor(quiet_config(), Box::new(Fixed("  \n")));
        let outcome = pipeline.process_file(&input, dir.path()).unwrap();
        assert_eq!(fs::read_to_string(outcome.text_path).unwrap(), NO_TEXT_PLACEHOLDER);
    }

    #[test]
    fn postprocessing_is_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.png");
        write_png(&input);

        let raw = Pipeline::with_extractor(quiet_config(), Box::new(Fixed("modern   text")));
        assert_eq!(raw.process_file(&input, dir.path()).unwrap().text, "modern   text");

        let config = AppConfig {
            postprocess_text: true,
            ..quiet_config()
        };
        let fixed = Pipeline::with_extractor(config, Box::new(Fixed("modern   text")));
        assert_eq!(fixed.process_file(&input, dir.path()).unwrap().text, "modem text");
    }

    #[test]
    fn orientation_and_saved_images() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        write_png(&input);
        let config = AppConfig {
            auto_rotate: true,
            save_images: true,
            preprocess: PreprocessProfile::Gentle,
            ..AppConfig::default()
        };

        // Same text at every angle, so the search keeps 0° and saves no rotation.
        let pipeline = Pipeline::with_extractor(config, Box::new(Fixed("abc")));
        let outcome = pipeline.process_file(&input, dir.path()).unwrap();
        assert_eq!(outcome.rotation, Some(Rotation::Deg0));
        assert_eq!(outcome.saved_images, vec![dir.path().join("photo_preprocessed.png")]);
        assert!(dir.path().join("photo_preprocessed.png").is_file());
    }

    #[test]
    fn comparison_writes_log_and_uses_best_engine() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cmp.png");
        write_png(&input);

        let engines: Vec<Box<dyn TextExtractor>> = vec![
            Box::new(Fixed("|| ≈")),
            Box::new(Unavailable {
                name: "paddleocr".into(),
                reason: "not installed".into(),
            }),
        ];
        let pipeline = Pipeline::comparing(quiet_config(), engines);
        let outcome = pipeline.process_file(&input, dir.path()).unwrap();

        // "|| ≈" scores 0, so nothing wins.
        assert_eq!(outcome.engine, "none");
        assert_eq!(outcome.text, NO_ENGINE_PLACEHOLDER);
        let log = fs::read_to_string(outcome.comparison_log.unwrap()).unwrap();
        assert!(log.contains("PADDLEOCR Results:\n  Success: false"));
    }

    #[test]
    fn batch_records_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        write_png(&good);
        let missing = dir.path().join("missing.png");

        let pipeline = Pipeline::with_extractor(quiet_config(), Box::new(Fixed("ok")));
        let summary = pipeline.run_batch(&[missing.clone(), good], &dir.path().join("out"));
        assert_eq!(summary.succeeded.len(), 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, missing);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn rotating_engine_that_always_fails_fails_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("IMG_0002.png");
        write_png(&input);
        let out = dir.path().join("out");
        let config = AppConfig {
            auto_rotate: true,
            ..quiet_config()
        };

        let broken = Unavailable {
            name: "tesseract".into(),
            reason: "segfault".into(),
        };
        let pipeline = Pipeline::with_extractor(config, Box::new(broken));
        let summary = pipeline.run_batch(&[input.clone()], &out);

        assert!(summary.succeeded.is_empty());
        assert_eq!(summary.failed.len(), 1);
        assert!(matches!(summary.failed[0].1, HeicTextError::OcrError(_)));
        assert!(!out.join("IMG_0002.txt").exists());
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn unavailable_engine_stops_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        write_png(&first);
        write_png(&second);

        let pipeline = Pipeline::with_extractor(quiet_config(), Box::new(NoPlatform));
        let summary = pipeline.run_batch(&[first.clone(), second.clone()], &dir.path().join("out"));
        assert!(summary.succeeded.is_empty());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, first);
        assert_eq!(summary.skipped, vec![second]);
        assert!(!summary.all_succeeded());
    }

    #[test]
    fn inputs_are_collected_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        for name in ["b.HEIC", "a.png", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::write(nested.join("c.jpg"), b"x").unwrap();
        let loose = dir.path().join("notes.txt");

        let files = collect_inputs(&[dir.path().to_path_buf(), loose]).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.png"), dir.path().join("b.HEIC"), nested.join("c.jpg")]
        );
    }
}
