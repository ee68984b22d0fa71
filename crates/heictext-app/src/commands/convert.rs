// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use heictext_core::AppConfig;
use heictext_core::error::{HeicTextError, Result};
use heictext_core::human_errors::humanize_error;
use heictext_ocr::pipeline::{Pipeline, collect_inputs, comparison_engines};
use heictext_ocr::words::preset;
use tracing::info;

use crate::cli::ConvertArgs;

/// Preview length printed per converted file.
const PREVIEW_CHARS: usize = 100;

fn apply(args: &ConvertArgs, config: &mut AppConfig) -> Result<()> {
    args.ocr.apply(config);
    if args.no_rotate {
        config.auto_rotate = false;
    }
    if args.save_images {
        config.save_images = true;
    }
    if args.postprocess {
        config.postprocess_text = true;
    }
    if let Some(name) = &args.preset {
        let preset = preset(name)
            .ok_or_else(|| HeicTextError::Config(format!("unknown word preset `{name}`")))?;
        config.custom_word_domains = preset.domains.iter().map(|d| d.name().to_string()).collect();
    } else if !args.custom_words.is_empty() {
        config.custom_word_domains = args.custom_words.clone();
    }
    Ok(())
}

fn preview(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_CHARS).collect::<String>().replace('\n', " ");
    if text.chars().count() > PREVIEW_CHARS {
        format!("{head}...")
    } else {
        head
    }
}

pub fn run(args: ConvertArgs, mut config: AppConfig) -> Result<bool> {
    apply(&args, &mut config)?;

    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        let searched: Vec<String> = args.inputs.iter().map(|p| p.display().to_string()).collect();
        return Err(HeicTextError::UnsupportedInput(format!(
            "no supported images found in {}",
            searched.join(", ")
        )));
    }
    info!(
        files = inputs.len(),
        output = %args.output.display(),
        engine = %config.engine,
        auto_rotate = config.auto_rotate,
        preprocess = %config.preprocess,
        compare = args.compare,
        "Starting conversion"
    );

    let pipeline = if args.compare {
        let engines = comparison_engines(&args.compare_engines, &config);
        Pipeline::comparing(config, engines)
    } else {
        Pipeline::new(config)?
    };

    let summary = pipeline.run_batch(&inputs, &args.output);
    for outcome in &summary.succeeded {
        println!(
            "{} -> {} ({})",
            outcome.input.display(),
            outcome.text_path.display(),
            outcome.engine
        );
        println!("    {}", preview(&outcome.text));
    }
    for (path, error) in &summary.failed {
        let human = humanize_error(error);
        println!("{}: {}", path.display(), human.message);
        println!("    {}", human.suggestion);
    }
    if !summary.skipped.is_empty() {
        println!("{} files skipped after the error above.", summary.skipped.len());
    }
    println!(
        "\n{} succeeded, {} failed. Text files are in {}",
        summary.succeeded.len(),
        summary.failed.len(),
        args.output.display()
    );
    Ok(summary.all_succeeded())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn convert_args(extra: &[&str]) -> ConvertArgs {
        let mut argv = vec!["heictext", "convert", "in.heic", "-o", "out"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Convert(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        apply(&convert_args(&["--no-rotate", "--postprocess", "--preset", "tf-ansible"]), &mut config).unwrap();
        assert!(!config.auto_rotate);
        assert!(config.postprocess_text);
        assert_eq!(config.custom_word_domains, ["terraform", "ansible"]);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let mut config = AppConfig::default();
        assert!(apply(&convert_args(&["--preset", "cobol"]), &mut config).is_err());
    }

    #[test]
    fn long_previews_are_cut() {
        let text = "a".repeat(150);
        assert_eq!(preview(&text).len(), PREVIEW_CHARS + 3);
        assert_eq!(preview("one\ntwo"), "one two");
    }
}
