// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use heictext_core::AppConfig;
use heictext_core::types::{EngineKind, PreprocessProfile, RecognitionLevel};

/// Turn HEIC photos of documents into text files with OCR.
#[derive(Parser, Debug)]
#[command(name = "heictext", version, about, long_about = None)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Read settings from this JSON file instead of the saved config.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert photos (files or directories) to text files
    Convert(ConvertArgs),

    /// Show what each rotation of a photo reads as
    Orient(OrientArgs),

    /// Run several engines on one photo and compare them
    Compare(CompareArgs),

    /// Rate the readability of a text file
    Score(ScoreArgs),

    /// Compare OCR output against a ground-truth transcription
    Similarity(SimilarityArgs),

    /// Benchmark a grid of settings against a ground-truth transcription
    Sweep(SweepArgs),

    /// Print custom-word vocabularies
    Words(WordsArgs),

    /// Show or create the saved configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Recognition settings shared by the image commands. Unset flags keep the
/// configured value.
#[derive(Args, Debug, Default)]
pub struct OcrArgs {
    /// OCR engine: vision, easyocr, tesseract, paddleocr, ocrs
    #[arg(short, long)]
    pub engine: Option<EngineKind>,

    /// Language code passed to the engine
    #[arg(short, long)]
    pub language: Option<String>,

    /// Preprocessing profile: none, gentle, standard, aggressive
    #[arg(short, long)]
    pub preprocess: Option<PreprocessProfile>,

    /// Longest image side in pixels before recognition
    #[arg(long, value_name = "PIXELS")]
    pub max_side: Option<u32>,
}

impl OcrArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(engine) = self.engine {
            config.engine = engine;
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(preprocess) = self.preprocess {
            config.preprocess = preprocess;
        }
        if let Some(max_side) = self.max_side {
            config.max_side = max_side;
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// HEIC/PNG/JPEG/TIFF files or directories to search
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory for the text files
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub ocr: OcrArgs,

    /// Skip the orientation search
    #[arg(long)]
    pub no_rotate: bool,

    /// Also write the preprocessed and rotated images
    #[arg(long)]
    pub save_images: bool,

    /// Collapse whitespace and fix common misreadings in the output
    #[arg(long)]
    pub postprocess: bool,

    /// Compare engines on every file and keep the best text
    #[arg(long)]
    pub compare: bool,

    /// Engines used by --compare
    #[arg(long, value_delimiter = ',', default_value = "easyocr,paddleocr")]
    pub compare_engines: Vec<EngineKind>,

    /// Custom-word domains for the vision engine (terraform, ansible, aws, postgresql, mysql)
    #[arg(long, value_delimiter = ',', value_name = "DOMAINS")]
    pub custom_words: Vec<String>,

    /// Named custom-word preset, e.g. tf-ansible-pg
    #[arg(long, conflicts_with = "custom_words")]
    pub preset: Option<String>,
}

#[derive(Args, Debug)]
pub struct OrientArgs {
    pub input: PathBuf,

    #[command(flatten)]
    pub ocr: OcrArgs,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    pub input: PathBuf,

    /// Engines to compare
    #[arg(long, value_delimiter = ',', default_value = "easyocr,paddleocr")]
    pub engines: Vec<EngineKind>,

    #[command(flatten)]
    pub ocr: OcrArgs,

    #[arg(long)]
    pub no_rotate: bool,

    /// Write the comparison log to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Text file to rate
    pub file: PathBuf,

    /// Print the full breakdown as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SimilarityArgs {
    /// Ground-truth transcription
    pub ground_truth: PathBuf,

    /// OCR output to measure
    pub ocr_text: PathBuf,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Photo to recognise
    pub image: PathBuf,

    /// Ground-truth transcription of the photo
    pub ground_truth: PathBuf,

    #[arg(long, value_delimiter = ',', default_value = "tesseract")]
    pub engines: Vec<EngineKind>,

    #[arg(long, value_delimiter = ',', default_value = "none,gentle,standard,aggressive")]
    pub profiles: Vec<PreprocessProfile>,

    /// Longest image sides to try; the configured size when omitted
    #[arg(long, value_delimiter = ',', value_name = "PIXELS")]
    pub max_sides: Vec<u32>,

    /// Orientation-search settings to try
    #[arg(long, value_delimiter = ',', default_value = "false,true")]
    pub auto_rotate: Vec<bool>,

    /// Vision recognition levels to try
    #[arg(long, value_delimiter = ',', default_value = "fast,accurate")]
    pub recognition_levels: Vec<RecognitionLevel>,

    /// Vision language-correction settings to try
    #[arg(long, value_delimiter = ',', default_value = "true,false")]
    pub language_correction: Vec<bool>,

    /// Vision minimum text heights to try, as fractions of the image height
    #[arg(long, value_delimiter = ',', default_value = "0,0.01,0.02,0.05")]
    pub min_text_heights: Vec<f32>,

    /// Vision language auto-detection settings to try
    #[arg(long, value_delimiter = ',', default_value = "true,false")]
    pub auto_detect_language: Vec<bool>,

    /// Vision recognition languages to try; `configured` keeps the saved list
    #[arg(long, value_delimiter = ',', default_value = "en,en-US")]
    pub vision_languages: Vec<String>,

    /// Custom-word presets tried with engines that support them; `none` for
    /// the baseline only
    #[arg(long, value_delimiter = ',', default_value = "all")]
    pub presets: Vec<String>,

    /// Language code passed to the engines
    #[arg(short, long)]
    pub language: Option<String>,

    /// Number of ranked results to print
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Write the full report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct WordsArgs {
    /// Domains to merge; all domains when empty
    #[arg(value_delimiter = ',')]
    pub domains: Vec<String>,

    /// Print a named preset instead
    #[arg(long, conflicts_with = "domains")]
    pub preset: Option<String>,

    /// List the presets
    #[arg(long)]
    pub list_presets: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON
    Show,
    /// Write the default configuration to the data directory
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print where the configuration file lives
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn convert_flags() {
        let cli = Cli::try_parse_from([
            "heictext", "convert", "a.HEIC", "photos", "-o", "out", "-e", "tesseract", "--preprocess",
            "gentle", "--no-rotate", "--custom-words", "terraform,aws",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.ocr.engine, Some(EngineKind::Tesseract));
        assert_eq!(args.ocr.preprocess, Some(PreprocessProfile::Gentle));
        assert!(args.no_rotate);
        assert_eq!(args.custom_words, ["terraform", "aws"]);
        assert_eq!(args.compare_engines, [EngineKind::EasyOcr, EngineKind::PaddleOcr]);
    }

    #[test]
    fn unknown_engine_is_rejected() {
        assert!(Cli::try_parse_from(["heictext", "convert", "a.heic", "-o", "out", "-e", "abbyy"]).is_err());
    }

    #[test]
    fn overrides_only_touch_given_fields() {
        let mut config = AppConfig::default();
        OcrArgs {
            language: Some("fra".into()),
            ..OcrArgs::default()
        }
        .apply(&mut config);
        assert_eq!(config.language, "fra");
        assert_eq!(config.engine, AppConfig::default().engine);
    }

    #[test]
    fn sweep_axes() {
        let cli = Cli::try_parse_from([
            "heictext", "sweep", "photo.heic", "truth.txt", "--engines", "vision", "--max-sides", "1024,4000",
            "--recognition-levels", "accurate", "--min-text-heights", "0.02",
        ])
        .unwrap();
        let Commands::Sweep(args) = cli.command else {
            panic!("expected sweep");
        };
        assert_eq!(args.engines, [EngineKind::Vision]);
        assert_eq!(args.max_sides, [1024, 4000]);
        assert_eq!(args.recognition_levels, [RecognitionLevel::Accurate]);
        assert_eq!(args.min_text_heights, [0.02]);
        assert_eq!(args.language_correction, [true, false]);
        assert_eq!(args.vision_languages, ["en", "en-US"]);
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["heictext", "config", "show", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
