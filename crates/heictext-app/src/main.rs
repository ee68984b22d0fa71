// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// heictext: HEIC photos of documents to plain text.
//
// Entry point. Parses the command line, initialises logging, and reports
// failures in plain English.

mod cli;
mod commands;
mod services;

use std::process::ExitCode;

use clap::Parser;
use heictext_core::human_errors::humanize_error;

use cli::Cli;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("heictext starting");

    match commands::run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "heictext failed");
            let human = humanize_error(&err);
            eprintln!("{}", human.message);
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}
