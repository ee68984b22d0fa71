// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Persisted configuration: `config.json` in the data directory.

use std::path::{Path, PathBuf};

use heictext_core::AppConfig;
use heictext_core::error::Result;
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load the saved config, or the defaults when none has been saved or the
/// file does not parse.
pub fn load_config(data_dir: &Path) -> Result<AppConfig> {
    let path = config_path(data_dir);
    if !path.is_file() {
        debug!(path = %path.display(), "No saved config, using defaults");
        return Ok(AppConfig::default());
    }
    let data = std::fs::read_to_string(&path)?;
    match AppConfig::from_json(&data) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Saved config is unreadable, using defaults");
            Ok(AppConfig::default())
        }
    }
}

pub fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir)?;
    let path = config_path(data_dir);
    std::fs::write(&path, config.to_json()?)?;
    info!(path = %path.display(), "Config saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heictext_core::types::EngineKind;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.engine, AppConfig::default().engine);
    }

    #[test]
    fn saved_config_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            engine: EngineKind::PaddleOcr,
            language: "deu".into(),
            ..AppConfig::default()
        };
        let path = persist_config(dir.path(), &config).unwrap();
        assert_eq!(path, dir.path().join("config.json"));

        let loaded = load_config(dir.path()).unwrap();
        assert_eq!(loaded.engine, EngineKind::PaddleOcr);
        assert_eq!(loaded.language, "deu");
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();
        assert_eq!(load_config(dir.path()).unwrap().max_side, AppConfig::default().max_side);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), r#"{"engine": "easyocr"}"#).unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.engine, EngineKind::EasyOcr);
        assert_eq!(config.language, "eng");
    }
}
