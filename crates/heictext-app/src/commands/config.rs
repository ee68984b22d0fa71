// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::Path;

use heictext_core::AppConfig;
use heictext_core::error::{HeicTextError, Result};

use crate::cli::ConfigCommand;
use crate::services::config_store;

pub fn run(command: ConfigCommand, config: AppConfig, data_dir: &Path) -> Result<bool> {
    match command {
        ConfigCommand::Show => println!("{}", config.to_json()?),
        ConfigCommand::Path => println!("{}", config_store::config_path(data_dir).display()),
        ConfigCommand::Init { force } => {
            let path = config_store::config_path(data_dir);
            if path.exists() && !force {
                return Err(HeicTextError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            let path = config_store::persist_config(data_dir, &AppConfig::default())?;
            println!("Wrote default configuration to {}", path.display());
        }
    }
    Ok(true)
}
