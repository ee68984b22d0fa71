// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Similarity of OCR output against a ground-truth transcription.

use std::collections::HashSet;

use serde::Serialize;

/// Lowercase, collapse whitespace runs to one space, trim.
pub fn normalize_for_comparison(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Edit-distance similarity in percent (0.0 to 100.0) after normalization.
///
/// Two blank texts are identical (100); one blank text against a non-blank
/// one scores 0.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_for_comparison(a);
    let b = normalize_for_comparison(b);
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 100.0,
        (true, false) | (false, true) => 0.0,
        _ if a == b => 100.0,
        _ => strsim::normalized_levenshtein(&a, &b) * 100.0,
    }
}

/// Several views of how close an OCR result is to the ground truth, each in
/// percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SimilarityMetrics {
    pub exact_match: bool,
    /// Case-sensitive edit similarity of the raw strings.
    pub sequence: f64,
    /// Edit similarity after [`normalize_for_comparison`].
    pub character: f64,
    /// Jaccard overlap of the lowercase word sets.
    pub word: f64,
}

impl SimilarityMetrics {
    pub fn measure(ground_truth: &str, ocr_text: &str) -> Self {
        Self {
            exact_match: ground_truth.trim() == ocr_text.trim(),
            sequence: strsim::normalized_levenshtein(ground_truth, ocr_text) * 100.0,
            character: text_similarity(ground_truth, ocr_text),
            word: word_jaccard(ground_truth, ocr_text) * 100.0,
        }
    }
}

fn word_jaccard(a: &str, b: &str) -> f64 {
    let a: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let b: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let union = a.union(&b).count();
    a.intersection(&b).count() as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(normalize_for_comparison("  Hello\n\tWORLD  "), "hello world");
    }

    #[test]
    fn equal_after_normalization_is_100() {
        assert_eq!(text_similarity("Terraform  Plan", "terraform plan\n"), 100.0);
    }

    #[test]
    fn empty_cases() {
        assert_eq!(text_similarity("", ""), 100.0);
        assert_eq!(text_similarity("", "text"), 0.0);
        assert_eq!(text_similarity("text", "   "), 0.0);
    }

    #[test]
    fn partial_overlap_is_between_bounds() {
        let score = text_similarity("terraform apply", "terraforn apply");
        assert!(score > 90.0 && score < 100.0, "{score}");
    }

    #[test]
    fn metrics_for_close_texts() {
        let m = SimilarityMetrics::measure("AWS region us-east-1", "aws region us-east-1");
        assert!(!m.exact_match);
        assert!(m.sequence < 100.0);
        assert_eq!(m.character, 100.0);
        assert_eq!(m.word, 100.0);
    }

    #[test]
    fn word_overlap_is_jaccard() {
        let m = SimilarityMetrics::measure("a b c d", "a b x");
        // {a, b} shared out of {a, b, c, d, x}
        assert!((m.word - 40.0).abs() < 1e-9);
    }
}
