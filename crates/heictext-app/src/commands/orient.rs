// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use heictext_core::AppConfig;
use heictext_core::error::Result;
use heictext_ocr::engine::build_engine;
use heictext_ocr::orientation::find_orientation;

use super::load_prepared;
use crate::cli::OrientArgs;

pub fn run(args: OrientArgs, mut config: AppConfig) -> Result<bool> {
    args.ocr.apply(&mut config);
    let engine = build_engine(config.engine, &config)?;
    let image = load_prepared(&args.input, &config)?;
    let report = find_orientation(&image, engine.as_ref())?;

    println!("{} ({})", args.input.display(), engine.name());
    println!("{:>8}  {:>12}  {}", "rotation", "alphanumeric", "first line");
    for candidate in &report.candidates {
        let marker = if candidate.rotation == report.best { "*" } else { " " };
        let detail = match &candidate.error {
            Some(error) => format!("error: {error}"),
            None => candidate.text.lines().next().unwrap_or("").to_string(),
        };
        println!(
            "{marker}{:>7}  {:>12}  {detail}",
            candidate.rotation.to_string(),
            candidate.alphanumeric
        );
    }
    println!("\nBest rotation: {}", report.best);
    Ok(true)
}
