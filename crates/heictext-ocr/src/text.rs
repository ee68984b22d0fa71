// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optional clean-up of recognised text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Standalone digits that OCR engines commonly produce for letters.
const DIGIT_FIXES: [(&str, &str); 4] = [("0", "O"), ("1", "I"), ("5", "S"), ("8", "B")];

/// Letter pairs commonly misread in place of a single letter.
const PAIR_FIXES: [(&str, &str); 3] = [("rn", "m"), ("cl", "d"), ("vv", "w")];

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));
static STANDALONE_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[0158]\b").expect("static regex"));
static NOT_KEPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s.,!?;:()-]").expect("static regex"));

/// Replace every whitespace run (including newlines) with one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Apply the common misrecognition fixes.
///
/// A digit from `0 1 5 8` that stands alone between word boundaries becomes
/// `O I S B`. Then every `rn`, `cl` and `vv` becomes `m`, `d` and `w`.
/// The pair substitutions are unconditional and will also rewrite correctly
/// recognised words such as "clear".
pub fn fix_common_ocr_errors(text: &str) -> String {
    let mut fixed = STANDALONE_DIGIT
        .replace_all(text, |caps: &Captures| {
            DIGIT_FIXES
                .iter()
                .find(|(digit, _)| *digit == &caps[0])
                .map_or_else(|| caps[0].to_string(), |(_, letter)| (*letter).to_string())
        })
        .into_owned();

    for (from, to) in PAIR_FIXES {
        fixed = fixed.replace(from, to);
    }
    fixed
}

/// Whitespace collapse followed by [`fix_common_ocr_errors`].
pub fn postprocess_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    fix_common_ocr_errors(&collapse_whitespace(text))
}

/// Drop everything except word characters, whitespace and `.,!?;:()-`, then
/// collapse whitespace.
pub fn clean_for_ocr(text: &str) -> String {
    collapse_whitespace(&NOT_KEPT.replace_all(text, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(collapse_whitespace("  a \n\n b\tc  "), "a b c");
    }

    #[test]
    fn standalone_digits_become_letters() {
        assert_eq!(fix_common_ocr_errors("0 1 5 8"), "O I S B");
        assert_eq!(fix_common_ocr_errors("(0)"), "(O)");
    }

    #[test]
    fn digits_inside_numbers_are_kept() {
        assert_eq!(fix_common_ocr_errors("port 8080 v1"), "port 8080 v1");
        assert_eq!(fix_common_ocr_errors("10.0.0.1"), "10.O.O.I");
    }

    #[test]
    fn letter_pairs_are_merged() {
        assert_eq!(fix_common_ocr_errors("modern"), "modem");
        assert_eq!(fix_common_ocr_errors("vvord"), "word");
        assert_eq!(fix_common_ocr_errors("clog"), "dog");
    }

    #[test]
    fn postprocess_combines_steps() {
        assert_eq!(postprocess_text("  hello\n\n 0  vvorld "), "hello O world");
        assert_eq!(postprocess_text(""), "");
    }

    #[test]
    fn digit_boundaries_follow_unicode_words() {
        assert_eq!(fix_common_ocr_errors("é5 5é 5"), "é5 5é S");
    }

    #[test]
    fn clean_strips_symbols() {
        assert_eq!(clean_for_ocr("a = b | c; (d)\n≈ e_f"), "a b c; (d) e_f");
    }
}
