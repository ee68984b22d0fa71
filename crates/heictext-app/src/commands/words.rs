// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use heictext_core::error::{HeicTextError, Result};
use heictext_ocr::words::{Domain, PRESETS, parse_domains, preset, words_for_domains};

use crate::cli::WordsArgs;

pub fn run(args: WordsArgs) -> Result<bool> {
    if args.list_presets {
        for (rank, preset) in PRESETS.iter().enumerate() {
            let domains: Vec<&str> = preset.domains.iter().map(Domain::name).collect();
            println!("{}. {:<22} {}", rank + 1, preset.name, domains.join(" + "));
        }
        return Ok(true);
    }

    let words = match &args.preset {
        Some(name) => preset(name)
            .ok_or_else(|| HeicTextError::Config(format!("unknown word preset `{name}`")))?
            .words(),
        None if args.domains.is_empty() => words_for_domains(&Domain::ALL),
        None => words_for_domains(&parse_domains(&args.domains)?),
    };
    for word in &words {
        println!("{word}");
    }
    Ok(true)
}
