//! Application configuration.
//!
//! Read from `charsheet.toml`: the `--config` path if given, otherwise the
//! current directory, otherwise the data directory. Missing keys fall back to
//! defaults and a missing file is not an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "charsheet.toml";

/// Environment variable that overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "CHARSHEET_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Where character files live.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_hp_bar_width")]
    pub hp_bar_width: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("characters")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("charsheet.log")
}

fn default_log_level() -> String {
    "info".into()
}

fn default_hp_bar_width() -> u16 {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_file: default_log_file(),
            log_level: default_log_level(),
            hp_bar_width: default_hp_bar_width(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Find and read the configuration.
    ///
    /// An explicit path must exist. `data_dir_override` (the environment
    /// value) wins over whatever the file says.
    pub fn load(
        explicit: Option<&Path>,
        cwd: &Path,
        data_dir_override: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback_dir = data_dir_override.clone().unwrap_or_else(default_data_dir);
                let candidates = [cwd.join(CONFIG_FILE), cwd.join(fallback_dir).join(CONFIG_FILE)];
                match candidates.iter().find(|path| path.is_file()) {
                    Some(path) => {
                        tracing::debug!(path = %path.display(), "Using config file");
                        Self::from_file(path)?
                    }
                    None => Self::default(),
                }
            }
        };
        if let Some(dir) = data_dir_override {
            config.data_dir = dir;
        }
        if config.hp_bar_width == 0 {
            config.hp_bar_width = default_hp_bar_width();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = AppConfig::from_toml("log_level = \"debug\"").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data_dir, PathBuf::from("characters"));
        assert_eq!(config.hp_bar_width, 20);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(AppConfig::from_toml("hp_bar_width = \"wide\"").is_err());
    }

    #[test]
    fn test_no_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(None, dir.path(), None).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_search_order() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("party");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join(CONFIG_FILE), "hp_bar_width = 30").unwrap();

        let config = AppConfig::load(None, dir.path(), Some(PathBuf::from("party"))).unwrap();
        assert_eq!(config.hp_bar_width, 30);
        assert_eq!(config.data_dir, PathBuf::from("party"));

        std::fs::write(dir.path().join(CONFIG_FILE), "hp_bar_width = 40").unwrap();
        let config = AppConfig::load(None, dir.path(), Some(PathBuf::from("party"))).unwrap();
        assert_eq!(config.hp_bar_width, 40);

        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "hp_bar_width = 50\ndata_dir = \"elsewhere\"").unwrap();
        let config = AppConfig::load(Some(&explicit), dir.path(), None).unwrap();
        assert_eq!(config.hp_bar_width, 50);
        assert_eq!(config.data_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing), dir.path(), None).is_err());
    }
}
