// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::time::Duration;

use heictext_core::AppConfig;
use heictext_core::error::{HeicTextError, Result};
use heictext_document::{HeicConverter, load_source};
use heictext_ocr::sweep::{SweepCombination, SweepGrid, VisionAxes, engine_for, run_sweep};
use heictext_ocr::words::{PRESETS, WordPreset, preset};
use tracing::info;

use super::read_text;
use crate::cli::SweepArgs;

/// `all`, `none`, or a list of preset names.
fn resolve_presets(names: &[String]) -> Result<Vec<&'static WordPreset>> {
    let mut presets = Vec::new();
    for name in names {
        match name.as_str() {
            "all" => presets.extend(PRESETS.iter()),
            "none" => {}
            other => presets.push(
                preset(other).ok_or_else(|| HeicTextError::Config(format!("unknown word preset `{other}`")))?,
            ),
        }
    }
    Ok(presets)
}

fn vision_axes(args: &SweepArgs) -> VisionAxes {
    VisionAxes {
        recognition_levels: args.recognition_levels.clone(),
        language_correction: args.language_correction.clone(),
        minimum_text_heights: args.min_text_heights.clone(),
        auto_detect_language: args.auto_detect_language.clone(),
        languages: args
            .vision_languages
            .iter()
            .map(|language| (language != "configured").then(|| language.clone()))
            .collect(),
    }
}

fn describe(c: &SweepCombination) -> String {
    let mut line = format!(
        "engine={} preprocess={} max_side={} auto_rotate={} preset={}",
        c.engine,
        c.preprocess,
        c.max_side,
        c.auto_rotate,
        c.word_preset.unwrap_or("none")
    );
    if let Some(v) = &c.vision {
        line.push_str(&format!(
            " level={} correction={} min_height={} auto_language={} language={}",
            v.recognition_level,
            v.uses_language_correction,
            v.minimum_text_height,
            v.automatically_detects_language,
            v.language.as_deref().unwrap_or("configured")
        ));
    }
    line
}

pub fn run(args: SweepArgs, mut config: AppConfig) -> Result<bool> {
    if let Some(language) = &args.language {
        config.language = language.clone();
    }
    let ground_truth = read_text(&args.ground_truth)?;
    let max_sides = if args.max_sides.is_empty() {
        vec![config.max_side]
    } else {
        args.max_sides.clone()
    };
    let grid = SweepGrid {
        engines: args.engines.clone(),
        profiles: args.profiles.clone(),
        max_sides,
        auto_rotate: args.auto_rotate.clone(),
        presets: resolve_presets(&args.presets)?,
        vision: vision_axes(&args),
    };
    info!(combinations = grid.combinations().len(), "Sweep grid ready");

    // Profiles are applied per combination, so start from the unprocessed image.
    let scratch = tempfile::tempdir()?;
    let converter = HeicConverter::new(Duration::from_secs(config.conversion_timeout_secs));
    let image = load_source(&args.image, scratch.path(), &converter)?;

    let report = run_sweep(&image, &ground_truth, &grid, |combination| {
        engine_for(combination, &config)
    });

    println!("{:<4} {:>10} {:>9}  {}", "rank", "similarity", "time (ms)", "parameters");
    for (rank, result) in report.results.iter().take(args.top).enumerate() {
        let status = if result.error.is_some() { " (failed)" } else { "" };
        println!(
            "{:<4} {:>9.2}% {:>9}  {}{status}",
            rank + 1,
            result.similarity,
            result.elapsed_ms,
            describe(&result.combination)
        );
    }

    println!("\nAverage similarity per parameter:");
    for average in &report.averages {
        println!(
            "  {:<20} {:<22} {:>6.2}% (n={})",
            average.parameter, average.value, average.mean_similarity, average.runs
        );
    }

    if let Some(path) = &args.json {
        std::fs::write(path, report.to_json()?)?;
        println!("\nDetailed results saved to {}", path.display());
    }
    Ok(report.results.iter().any(|result| result.error.is_none()))
}
