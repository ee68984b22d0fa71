// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid benchmark of OCR settings against a ground-truth transcription.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Local};
use heictext_core::config::AppConfig;
use heictext_core::error::Result;
use heictext_core::types::{EngineKind, PreprocessProfile, RecognitionLevel, VisionOptions};
use heictext_document::ScanEnhancer;
use image::DynamicImage;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::engine::{TextExtractor, build_engine};
use crate::orientation::find_orientation;
use crate::similarity::SimilarityMetrics;
use crate::words::{PRESETS, WordPreset};

/// Characters of extracted text kept in each result.
const TEXT_PREVIEW_CHARS: usize = 100;

/// The axes of a sweep. Every combination is run once.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    pub engines: Vec<EngineKind>,
    pub profiles: Vec<PreprocessProfile>,
    /// Longest image side after preprocessing.
    pub max_sides: Vec<u32>,
    pub auto_rotate: Vec<bool>,
    /// Custom-word presets tried in addition to no custom words. Only engines
    /// that honour custom words are crossed with them.
    pub presets: Vec<&'static WordPreset>,
    /// Request settings crossed with the native vision engine only.
    pub vision: VisionAxes,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            engines: vec![EngineKind::Tesseract],
            profiles: PreprocessProfile::ALL.to_vec(),
            max_sides: vec![AppConfig::default().max_side],
            auto_rotate: vec![false, true],
            presets: PRESETS.iter().collect(),
            vision: VisionAxes::default(),
        }
    }
}

impl SweepGrid {
    pub fn combinations(&self) -> Vec<SweepCombination> {
        let vision_settings = self.vision.settings();
        let mut out = Vec::new();
        for &engine in &self.engines {
            let mut presets = vec![None];
            if engine.supports_custom_words() {
                presets.extend(self.presets.iter().map(|preset| Some(preset.name)));
            }
            let visions: Vec<Option<VisionTuning>> = if engine == EngineKind::Vision {
                vision_settings.iter().cloned().map(Some).collect()
            } else {
                vec![None]
            };
            for &preprocess in &self.profiles {
                for &max_side in &self.max_sides {
                    for &auto_rotate in &self.auto_rotate {
                        for &preset in &presets {
                            for vision in &visions {
                                out.push(SweepCombination {
                                    engine,
                                    preprocess,
                                    max_side,
                                    auto_rotate,
                                    word_preset: preset,
                                    vision: vision.clone(),
                                });
                            }
                        }
                    }
                }
            }
        }
        out
    }
}

/// Vision request settings to cross, one list per option.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionAxes {
    pub recognition_levels: Vec<RecognitionLevel>,
    pub language_correction: Vec<bool>,
    pub minimum_text_heights: Vec<f32>,
    pub auto_detect_language: Vec<bool>,
    /// Recognition language; `None` keeps the configured languages.
    pub languages: Vec<Option<String>>,
}

/// Only the tuned defaults.
impl Default for VisionAxes {
    fn default() -> Self {
        let tuned = VisionOptions::default();
        Self {
            recognition_levels: vec![tuned.recognition_level],
            language_correction: vec![tuned.uses_language_correction],
            minimum_text_heights: vec![tuned.minimum_text_height],
            auto_detect_language: vec![tuned.automatically_detects_language],
            languages: vec![None],
        }
    }
}

impl VisionAxes {
    /// The ranges the vision defaults were chosen from.
    pub fn exhaustive() -> Self {
        Self {
            recognition_levels: RecognitionLevel::ALL.to_vec(),
            language_correction: vec![true, false],
            minimum_text_heights: vec![0.0, 0.01, 0.02, 0.05],
            auto_detect_language: vec![true, false],
            languages: vec![Some("en".into()), Some("en-US".into())],
        }
    }

    pub fn settings(&self) -> Vec<VisionTuning> {
        let mut out = Vec::new();
        for &recognition_level in &self.recognition_levels {
            for &uses_language_correction in &self.language_correction {
                for &minimum_text_height in &self.minimum_text_heights {
                    for &automatically_detects_language in &self.auto_detect_language {
                        for language in &self.languages {
                            out.push(VisionTuning {
                                recognition_level,
                                uses_language_correction,
                                minimum_text_height,
                                automatically_detects_language,
                                language: language.clone(),
                            });
                        }
                    }
                }
            }
        }
        out
    }
}

/// One point of [`VisionAxes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisionTuning {
    pub recognition_level: RecognitionLevel,
    pub uses_language_correction: bool,
    pub minimum_text_height: f32,
    pub automatically_detects_language: bool,
    pub language: Option<String>,
}

impl VisionTuning {
    fn apply(&self, options: &mut VisionOptions) {
        options.recognition_level = self.recognition_level;
        options.uses_language_correction = self.uses_language_correction;
        options.minimum_text_height = self.minimum_text_height;
        options.automatically_detects_language = self.automatically_detects_language;
        if let Some(language) = &self.language {
            options.recognition_languages = vec![language.clone()];
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepCombination {
    pub engine: EngineKind,
    pub preprocess: PreprocessProfile,
    pub max_side: u32,
    pub auto_rotate: bool,
    pub word_preset: Option<&'static str>,
    /// Set for the vision engine only.
    pub vision: Option<VisionTuning>,
}

impl SweepCombination {
    /// `config` with this combination's settings applied.
    pub fn apply_to(&self, config: &AppConfig) -> AppConfig {
        let mut config = config.clone();
        config.engine = self.engine;
        config.preprocess = self.preprocess;
        config.max_side = self.max_side;
        config.auto_rotate = self.auto_rotate;
        config.custom_word_domains = self
            .word_preset
            .and_then(crate::words::preset)
            .map(|preset| preset.domains.iter().map(|d| d.name().to_string()).collect())
            .unwrap_or_default();
        if let Some(vision) = &self.vision {
            vision.apply(&mut config.vision);
        }
        config
    }
}

/// Build the engine for `combination` through [`build_engine`].
pub fn engine_for(combination: &SweepCombination, config: &AppConfig) -> Result<Box<dyn TextExtractor>> {
    let config = combination.apply_to(config);
    build_engine(combination.engine, &config)
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepResult {
    pub combination: SweepCombination,
    pub metrics: SimilarityMetrics,
    /// Character similarity in percent; 0 when nothing was extracted.
    pub similarity: f64,
    pub text_length: usize,
    pub text_preview: String,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterAverage {
    pub parameter: &'static str,
    pub value: String,
    pub mean_similarity: f64,
    pub runs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub timestamp: DateTime<Local>,
    /// Best first.
    pub results: Vec<SweepResult>,
    pub averages: Vec<ParameterAverage>,
}

impl SweepReport {
    pub fn best(&self) -> Option<&SweepResult> {
        self.results.first()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > TEXT_PREVIEW_CHARS {
        let head: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn run_one(
    image: &DynamicImage,
    ground_truth: &str,
    combination: SweepCombination,
    engine: Result<Box<dyn TextExtractor>>,
) -> SweepResult {
    let started = Instant::now();
    let outcome = engine.and_then(|engine| {
        if combination.auto_rotate {
            find_orientation(image, engine.as_ref()).map(|report| report.best_text)
        } else {
            engine.extract_text(image)
        }
    });
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(text) => {
            let metrics = SimilarityMetrics::measure(ground_truth, &text);
            let similarity = if text.trim().is_empty() { 0.0 } else { metrics.character };
            SweepResult {
                combination,
                metrics,
                similarity,
                text_length: text.chars().count(),
                text_preview: preview(&text),
                elapsed_ms,
                error: None,
            }
        }
        Err(err) => {
            warn!(?combination, error = %err, "Sweep combination failed");
            SweepResult {
                combination,
                metrics: SimilarityMetrics::default(),
                similarity: 0.0,
                text_length: 0,
                text_preview: String::new(),
                elapsed_ms,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Run every combination of `grid` on `image` and rank by similarity to
/// `ground_truth`.
///
/// `make_engine` is called once per combination; a construction error is
/// recorded as a failed result. Each profile and size is preprocessed once
/// and shared across combinations.
#[instrument(skip_all, fields(combinations = tracing::field::Empty))]
pub fn run_sweep<F>(image: &DynamicImage, ground_truth: &str, grid: &SweepGrid, mut make_engine: F) -> SweepReport
where
    F: FnMut(&SweepCombination) -> Result<Box<dyn TextExtractor>>,
{
    let combinations = grid.combinations();
    tracing::Span::current().record("combinations", combinations.len());

    let mut prepared: HashMap<(PreprocessProfile, u32), DynamicImage> = HashMap::new();
    let mut results = Vec::with_capacity(combinations.len());
    for (index, combination) in combinations.into_iter().enumerate() {
        let input = prepared
            .entry((combination.preprocess, combination.max_side))
            .or_insert_with(|| {
                ScanEnhancer::from_dynamic(image.clone())
                    .apply_profile(combination.preprocess, combination.max_side)
                    .into_dynamic()
            });
        let engine = make_engine(&combination);
        let result = run_one(input, ground_truth, combination, engine);
        let done = &result.combination;
        info!(
            index,
            engine = %done.engine,
            preprocess = %done.preprocess,
            max_side = done.max_side,
            auto_rotate = done.auto_rotate,
            preset = done.word_preset.unwrap_or("-"),
            vision = ?done.vision,
            similarity = result.similarity,
            elapsed_ms = result.elapsed_ms,
            "Sweep combination done"
        );
        results.push(result);
    }

    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    let averages = parameter_averages(&results);
    SweepReport {
        timestamp: Local::now(),
        results,
        averages,
    }
}

type ParameterKey = fn(&SweepCombination) -> Option<String>;

/// Mean similarity per value of each swept parameter, values in first-seen
/// order. Vision settings are averaged over vision runs only.
pub fn parameter_averages(results: &[SweepResult]) -> Vec<ParameterAverage> {
    let keys: [(&'static str, ParameterKey); 10] = [
        ("engine", |c| Some(c.engine.to_string())),
        ("preprocess", |c| Some(c.preprocess.to_string())),
        ("max_side", |c| Some(c.max_side.to_string())),
        ("auto_rotate", |c| Some(c.auto_rotate.to_string())),
        ("word_preset", |c| Some(c.word_preset.unwrap_or("none").to_string())),
        ("recognition_level", |c| c.vision.as_ref().map(|v| v.recognition_level.to_string())),
        ("language_correction", |c| c.vision.as_ref().map(|v| v.uses_language_correction.to_string())),
        ("minimum_text_height", |c| c.vision.as_ref().map(|v| v.minimum_text_height.to_string())),
        ("auto_detect_language", |c| {
            c.vision.as_ref().map(|v| v.automatically_detects_language.to_string())
        }),
        ("language", |c| {
            c.vision
                .as_ref()
                .map(|v| v.language.clone().unwrap_or_else(|| "configured".to_string()))
        }),
    ];

    let mut averages = Vec::new();
    for (parameter, key) in keys {
        let mut groups: Vec<(String, f64, usize)> = Vec::new();
        for result in results {
            let Some(value) = key(&result.combination) else {
                continue;
            };
            match groups.iter_mut().find(|(v, _, _)| *v == value) {
                Some((_, sum, count)) => {
                    *sum += result.similarity;
                    *count += 1;
                }
                None => groups.push((value, result.similarity, 1)),
            }
        }
        averages.extend(groups.into_iter().map(|(value, sum, runs)| ParameterAverage {
            parameter,
            value,
            mean_similarity: sum / runs as f64,
            runs,
        }));
    }
    averages
}
