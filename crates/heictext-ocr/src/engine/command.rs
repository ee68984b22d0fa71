// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR programs driven through a command-line template (EasyOCR, PaddleOCR).

use std::sync::LazyLock;
use std::time::Duration;

use heictext_core::config::{CommandSettings, OutputFormat};
use heictext_core::error::{HeicTextError, Result};
use heictext_document::image::processor::encode_png;
use heictext_document::process::run_tool;
use image::DynamicImage;
use regex::Regex;
use tracing::{debug, instrument};

use super::TextExtractor;

/// Tesseract-style three-letter codes and their two-letter equivalents, which
/// the Python engines expect.
const LANGUAGE_CODES: [(&str, &str); 10] = [
    ("eng", "en"),
    ("deu", "de"),
    ("fra", "fr"),
    ("spa", "es"),
    ("ita", "it"),
    ("por", "pt"),
    ("nld", "nl"),
    ("jpn", "ja"),
    ("kor", "ko"),
    ("chi_sim", "ch_sim"),
];

/// Two-letter form of `language` when a mapping is known, else unchanged.
pub fn short_language_code(language: &str) -> &str {
    LANGUAGE_CODES
        .iter()
        .find(|(long, _)| long.eq_ignore_ascii_case(language))
        .map(|(_, short)| *short)
        .unwrap_or(language)
}

/// Substitute `{input}` and `{lang}` in every argument.
pub fn fill_template(args: &[String], input: &str, language: &str) -> Vec<String> {
    args.iter()
        .map(|arg| arg.replace("{input}", input).replace("{lang}", language))
        .collect()
}

/// Non-blank lines, trimmed.
fn parse_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// `('text', score)` or `("text", score)` at the end of a result line.
static PADDLE_RESULT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\(\s*['"](.*)['"]\s*,\s*[0-9.eE+-]+\s*\)"#).expect("static regex")
});

/// Text of every `[box, ('text', score)]` result line; other lines (logging)
/// are skipped.
fn parse_paddle_tuples(stdout: &str) -> Vec<String> {
    stdout.lines().filter_map(paddle_tuple_text).collect()
}

fn paddle_tuple_text(line: &str) -> Option<String> {
    let text = PADDLE_RESULT.captures(line)?.get(1)?.as_str().trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// An external OCR command configured by [`CommandSettings`].
pub struct CommandEngine {
    name: String,
    settings: CommandSettings,
    language: String,
    timeout: Duration,
}

impl CommandEngine {
    pub fn new(name: &str, settings: CommandSettings, language: &str, timeout: Duration) -> Self {
        Self {
            name: name.to_string(),
            settings,
            language: short_language_code(language).to_string(),
            timeout,
        }
    }

    fn parse(&self, stdout: &str) -> String {
        let lines = match self.settings.output {
            OutputFormat::Lines => parse_lines(stdout),
            OutputFormat::PaddleTuples => parse_paddle_tuples(stdout),
        };
        lines.join("\n")
    }
}

impl TextExtractor for CommandEngine {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(engine = %self.name, width = image.width(), height = image.height()))]
    fn extract_text(&self, image: &DynamicImage) -> Result<String> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("input.png");
        std::fs::write(&input, encode_png(image)?)?;

        let args = fill_template(&self.settings.args, &input.display().to_string(), &self.language);
        let output = run_tool(&self.settings.program, &args, None, self.timeout)?;
        if !output.success() {
            return Err(HeicTextError::OcrError(format!(
                "{} exited with {:?}: {}",
                self.settings.program,
                output.status.code(),
                output.stderr_lossy()
            )));
        }

        let text = self.parse(&output.stdout_lossy());
        debug!(chars = text.len(), "Command engine finished");
        Ok(text)
    }
}
