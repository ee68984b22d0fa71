// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution.

use std::path::PathBuf;

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = resolve(std::env::var("XDG_DATA_HOME").ok(), std::env::var("HOME").ok());
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// `$XDG_DATA_HOME/heictext`, else `$HOME/.local/share/heictext`, else a
/// directory under `/tmp`.
fn resolve(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    let base = match (xdg_data_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) if !home.is_empty() => PathBuf::from(home).join(".local").join("share"),
        // Last resort
        _ => PathBuf::from("/tmp"),
    };
    base.join("heictext")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        assert_eq!(
            resolve(Some("/x/data".into()), Some("/home/u".into())),
            PathBuf::from("/x/data/heictext")
        );
    }

    #[test]
    fn home_fallback() {
        assert_eq!(
            resolve(Some(String::new()), Some("/home/u".into())),
            PathBuf::from("/home/u/.local/share/heictext")
        );
        assert_eq!(resolve(None, None), PathBuf::from("/tmp/heictext"));
    }
}
