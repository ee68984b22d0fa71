// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use heictext_core::error::Result;
use heictext_ocr::quality::TextQuality;

use super::read_text;
use crate::cli::ScoreArgs;

pub fn run(args: ScoreArgs) -> Result<bool> {
    let text = read_text(&args.file)?;
    let quality = TextQuality::assess(&text);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&quality)?);
        return Ok(true);
    }
    println!("{}", args.file.display());
    println!("  Score:                 {:.1}", quality.score);
    println!("  Normalized:            {:.1}", quality.normalized());
    println!("  Characters:            {}", quality.total_chars);
    println!("  Meaningful characters: {}", quality.meaningful_chars);
    println!("  Gibberish characters:  {}", quality.gibberish_chars);
    println!("  Words:                 {}", quality.words);
    println!("  Meaningful lines:      {}", quality.meaningful_lines);
    println!("  Single-char tokens:    {}/{}", quality.single_char_tokens, quality.tokens);
    Ok(true)
}
