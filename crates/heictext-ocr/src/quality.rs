// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Heuristic readability score for OCR output.
//
// Counts characters, words and lines with hand-tuned weights so that results
// from different page segmentation modes, rotations or engines can be ranked
// against each other without a ground truth.

use serde::Serialize;

/// Punctuation that counts as meaningful alongside alphanumerics.
pub const MEANINGFUL_PUNCTUATION: &str = ".,!?;:()[]{}\"'@#$%^&*+-=<>/\\|_~` ";

/// Symbols that OCR engines hallucinate from noise.
pub const GIBBERISH_SYMBOLS: &str = "=|°§±×÷∞≤≥≠≈∑∏∫∂∇∆√∝∈∉⊂⊃∪∩∧∨¬→←↑↓↔↕↖↗↘↙";

const MEANINGFUL_WEIGHT: f64 = 1.0;
const GIBBERISH_PENALTY: f64 = 5.0;
const SPECIAL_PENALTY: f64 = 3.0;
const WORD_BONUS: f64 = 3.0;
const LINE_BONUS: f64 = 2.0;
const SINGLE_CHAR_PENALTY: f64 = 2.0;
const SINGLE_CHAR_RATIO: f64 = 0.6;
const SHORT_TEXT_LEN: usize = 10;
const SHORT_TEXT_PENALTY: f64 = 10.0;
const LONG_TEXT_LEN: usize = 50;
const LONG_TEXT_BONUS: f64 = 5.0;

fn is_meaningful(c: char) -> bool {
    c.is_alphanumeric() || MEANINGFUL_PUNCTUATION.contains(c)
}

fn is_gibberish(c: char) -> bool {
    GIBBERISH_SYMBOLS.contains(c)
}

fn is_special(c: char) -> bool {
    c != '=' && GIBBERISH_SYMBOLS.contains(c)
}

/// Counts behind a quality score, plus the score itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextQuality {
    pub total_chars: usize,
    /// Length after trimming surrounding whitespace.
    pub trimmed_chars: usize,
    pub meaningful_chars: usize,
    pub gibberish_chars: usize,
    pub special_chars: usize,
    /// Whitespace-separated tokens longer than one character that contain an
    /// alphanumeric.
    pub words: usize,
    /// Non-blank lines containing an alphanumeric.
    pub meaningful_lines: usize,
    pub tokens: usize,
    pub single_char_tokens: usize,
    /// Raw weighted score; higher is better. Zero for blank text.
    pub score: f64,
}

impl TextQuality {
    pub fn assess(text: &str) -> Self {
        let trimmed_chars = text.trim().chars().count();
        let total_chars = text.chars().count();
        if trimmed_chars == 0 {
            return Self {
                total_chars,
                ..Self::default()
            };
        }

        let mut meaningful_chars = 0;
        let mut gibberish_chars = 0;
        let mut special_chars = 0;
        for c in text.chars() {
            if is_meaningful(c) {
                meaningful_chars += 1;
            }
            if is_gibberish(c) {
                gibberish_chars += 1;
            }
            if is_special(c) {
                special_chars += 1;
            }
        }

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let words = tokens
            .iter()
            .filter(|token| token.chars().count() > 1 && token.chars().any(char::is_alphanumeric))
            .count();
        let single_char_tokens = tokens.iter().filter(|token| token.chars().count() == 1).count();
        let meaningful_lines = text
            .lines()
            .filter(|line| line.chars().any(char::is_alphanumeric))
            .count();

        let mut score = meaningful_chars as f64 * MEANINGFUL_WEIGHT
            - gibberish_chars as f64 * GIBBERISH_PENALTY
            - special_chars as f64 * SPECIAL_PENALTY
            + words as f64 * WORD_BONUS
            + meaningful_lines as f64 * LINE_BONUS;

        if single_char_tokens as f64 > tokens.len() as f64 * SINGLE_CHAR_RATIO {
            score -= single_char_tokens as f64 * SINGLE_CHAR_PENALTY;
        }
        if trimmed_chars < SHORT_TEXT_LEN {
            score -= SHORT_TEXT_PENALTY;
        }
        if trimmed_chars > LONG_TEXT_LEN {
            score += LONG_TEXT_BONUS;
        }

        Self {
            total_chars,
            trimmed_chars,
            meaningful_chars,
            gibberish_chars,
            special_chars,
            words,
            meaningful_lines,
            tokens: tokens.len(),
            single_char_tokens,
            score,
        }
    }

    /// Score per 100 trimmed characters, floored at zero. Comparable across
    /// texts of different lengths.
    pub fn normalized(&self) -> f64 {
        if self.trimmed_chars == 0 {
            return 0.0;
        }
        (self.score / self.trimmed_chars as f64 * 100.0).max(0.0)
    }
}

/// Shorthand for `TextQuality::assess(text).score`.
pub fn quality_score(text: &str) -> f64 {
    TextQuality::assess(text).score
}

/// Number of alphanumeric characters; the orientation-search metric.
pub fn alphanumeric_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphanumeric()).count()
}
