// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use heictext_core::error::Result;
use heictext_ocr::similarity::SimilarityMetrics;

use super::read_text;
use crate::cli::SimilarityArgs;

pub fn run(args: SimilarityArgs) -> Result<bool> {
    let truth = read_text(&args.ground_truth)?;
    let ocr = read_text(&args.ocr_text)?;
    let metrics = SimilarityMetrics::measure(&truth, &ocr);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("Exact match: {}", metrics.exact_match);
        println!("Sequence:    {:.2}%", metrics.sequence);
        println!("Character:   {:.2}%", metrics.character);
        println!("Word:        {:.2}%", metrics.word);
    }
    Ok(true)
}
