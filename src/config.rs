//! Configuration file and setting resolution
//!
//! Settings come from, in order of precedence: command line flags (and their
//! environment variables), `<config_dir>/intel-core/config.json`, defaults.

use crate::error::AppError;
use crate::reveal::DEFAULT_REVEAL_DELAY;
use crate::search::MatcherKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON file holding the record collection
    pub data_path: Option<PathBuf>,
    /// Directory dossiers are written to
    pub export_dir: PathBuf,
    /// Delay before a selection is revealed in session mode
    pub reveal_delay_ms: u64,
    pub matcher: MatcherKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            export_dir: PathBuf::from("."),
            reveal_delay_ms: DEFAULT_REVEAL_DELAY.as_millis() as u64,
            matcher: MatcherKind::default(),
        }
    }
}

impl Config {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Override file settings with values given on the command line
    pub fn with_overrides(
        mut self,
        data_path: Option<PathBuf>,
        export_dir: Option<PathBuf>,
        matcher: Option<MatcherKind>,
    ) -> Self {
        if data_path.is_some() {
            self.data_path = data_path;
        }
        if let Some(dir) = export_dir {
            self.export_dir = dir;
        }
        if let Some(matcher) = matcher {
            self.matcher = matcher;
        }
        self
    }

    /// Record file path, required for every command that touches records
    pub fn require_data_path(&self) -> Result<&Path, AppError> {
        self.data_path.as_deref().ok_or_else(|| {
            AppError::ConfigError(
                "No record file configured. Pass --data, set INTEL_CORE_DATA, or add data_path to the config file"
                    .to_string(),
            )
        })
    }
}

/// Get the path to the configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;

    Ok(config_dir.join("intel-core").join("config.json"))
}

/// Load the configuration from disk
pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    load_config_from(&path)
}

/// Load configuration from a specific file; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let data = fs::read_to_string(path).context("Failed to read config file")?;

    let config: Config = serde_json::from_str(&data).context("Failed to parse config file")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reveal_delay(), Duration::from_millis(800));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"data_path": "/data/records.json", "matcher": "nucleo"}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("/data/records.json")));
        assert_eq!(config.matcher, MatcherKind::Nucleo);
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config {
            data_path: Some(PathBuf::from("file.json")),
            ..Config::default()
        }
        .with_overrides(None, Some(PathBuf::from("out")), None);

        assert_eq!(config.data_path, Some(PathBuf::from("file.json")));
        assert_eq!(config.export_dir, PathBuf::from("out"));
        assert!(config.require_data_path().is_ok());
        assert!(Config::default().require_data_path().is_err());
    }
}
