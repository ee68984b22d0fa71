// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use chrono::Local;
use heictext_core::AppConfig;
use heictext_core::error::Result;
use heictext_ocr::compare::{ComparisonLog, analyze, compare_engines};
use heictext_ocr::pipeline::comparison_engines;
use tracing::info;

use super::load_prepared;
use crate::cli::CompareArgs;

pub fn run(args: CompareArgs, mut config: AppConfig) -> Result<bool> {
    args.ocr.apply(&mut config);
    if args.no_rotate {
        config.auto_rotate = false;
    }
    let engines = comparison_engines(&args.engines, &config);
    let image = load_prepared(&args.input, &config)?;

    let runs = compare_engines(&image, &engines, config.auto_rotate);
    let analysis = analyze(&runs);
    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());
    let log = ComparisonLog {
        file_name: &file_name,
        timestamp: Local::now(),
        auto_rotate: config.auto_rotate,
        preprocess: config.preprocess,
        runs: &runs,
        analysis: &analysis,
    }
    .render();

    match &args.log {
        Some(path) => {
            std::fs::write(path, &log)?;
            info!(path = %path.display(), "Comparison log written");
        }
        None => print!("{log}"),
    }
    if let Some(best) = analysis.best_run(&runs) {
        println!("Best engine: {}\n\n{}", best.engine, best.text);
    }
    Ok(analysis.successful_engines > 0)
}
