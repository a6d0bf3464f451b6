//! App Configuration
//!
//! `config.json` in the app data directory. Every field has a default, so a
//! partial file loads. A missing file is created with the defaults so it can
//! be edited by hand.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the pattern import server
    pub import_base_url: String,
    pub request_timeout_secs: u64,
    /// Database file name inside the app data directory
    pub database_file: String,
    /// Daily log files to keep
    pub log_retention: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            import_base_url: "http://127.0.0.1:3001".to_string(),
            request_timeout_secs: 30,
            database_file: "knitting.db".to_string(),
            log_retention: 7,
        }
    }
}

impl AppConfig {
    /// Load `config.json` from `dir`. When absent, write and return the defaults.
    pub fn load_or_default(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                match config.save(dir) {
                    Ok(()) => log::info!("Wrote default config to {}", path.display()),
                    Err(e) => log::warn!("Using default config: {}", e),
                }
                return Ok(config);
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        std::fs::create_dir_all(dir)
            .and_then(|_| std::fs::write(&path, text))
            .map_err(|source| ConfigError::Io { path, source })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn database_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.database_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));

        // Defaults are written out for editing
        let written = std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert!(written.contains("\"import_base_url\""));
    }

    #[test]
    fn test_edited_default_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        AppConfig::load_or_default(dir.path()).unwrap();

        let path = dir.path().join(CONFIG_FILE);
        let text = std::fs::read_to_string(&path)
            .unwrap()
            .replace("\"knitting.db\"", "\"other.db\"");
        std::fs::write(&path, text).unwrap();

        let config = AppConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.database_path(dir.path()), dir.path().join("other.db"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "import_base_url": "http://192.168.1.20:3001" }"#,
        )
        .unwrap();

        let config = AppConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.import_base_url, "http://192.168.1.20:3001");
        assert_eq!(config.database_file, "knitting.db");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load_or_default(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            log_retention: 3,
            ..AppConfig::default()
        };
        config.save(&dir.path().join("nested")).unwrap();
        let loaded = AppConfig::load_or_default(&dir.path().join("nested")).unwrap();
        assert_eq!(loaded, config);
    }
}
