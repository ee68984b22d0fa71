// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand handlers. Each returns whether it fully succeeded; hard errors
// propagate to `main` for reporting.

mod compare;
mod config;
mod convert;
mod orient;
mod score;
mod similarity;
mod sweep;
mod words;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use heictext_core::AppConfig;
use heictext_core::error::Result;
use heictext_document::{HeicConverter, ScanEnhancer, load_source};
use image::DynamicImage;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::services::{config_store, data_dir};

pub fn run(cli: Cli) -> Result<ExitCode> {
    let data_dir = data_dir::data_dir();
    let config = match &cli.config {
        Some(path) => AppConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => config_store::load_config(&data_dir)?,
    };
    debug!(engine = %config.engine, language = %config.language, "Configuration loaded");

    let ok = match cli.command {
        Commands::Convert(args) => convert::run(args, config)?,
        Commands::Orient(args) => orient::run(args, config)?,
        Commands::Compare(args) => compare::run(args, config)?,
        Commands::Score(args) => score::run(args)?,
        Commands::Similarity(args) => similarity::run(args)?,
        Commands::Sweep(args) => sweep::run(args, config)?,
        Commands::Words(args) => words::run(args)?,
        Commands::Config(command) => config::run(command, config, &data_dir)?,
    };
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Decode `path` (converting HEIC on the way) and apply the configured
/// preprocessing profile.
fn load_prepared(path: &Path, config: &AppConfig) -> Result<DynamicImage> {
    let scratch = tempfile::tempdir()?;
    let converter = HeicConverter::new(Duration::from_secs(config.conversion_timeout_secs));
    let source = load_source(path, scratch.path(), &converter)?;
    Ok(ScanEnhancer::from_dynamic(source)
        .apply_profile(config.preprocess, config.max_side)
        .into_dynamic())
}

fn read_text(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}
