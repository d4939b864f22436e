//! Persistent scan defaults.
//!
//! Settings live in `settings.json` under the XDG config directory
//! (`~/.config/quickscan` on Linux). Every field is optional in the file;
//! anything missing takes the built-in default.

use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputFormat;
use crate::scanner::{DEFAULT_PACE_DELAY, DEFAULT_TIMEOUT, DEFAULT_WORKERS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/quickscan)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the XDG directories. Nothing is created on disk.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "quickscan", "quickscan")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Scan defaults that command-line flags override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Per-port connect timeout in milliseconds.
    pub timeout_ms: u64,
    /// Worker pool size for `--fast` scans.
    pub workers: usize,
    /// Trailing pause after a `--slow` scan, in milliseconds.
    pub pace_delay_ms: u64,
    /// Print open ports as they are found.
    pub verbose: bool,
    /// Result output format.
    pub output: OutputFormat,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            workers: DEFAULT_WORKERS,
            pace_delay_ms: DEFAULT_PACE_DELAY.as_millis() as u64,
            verbose: false,
            output: OutputFormat::default(),
        }
    }
}

impl ScanSettings {
    /// Load settings from the default location, falling back to defaults
    /// when there is no settings file.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();

        if !file.exists() {
            debug!(path = %file.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file, which must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pace_delay(&self) -> Duration {
        Duration::from_millis(self.pace_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_settings(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_settings() {
        let settings = ScanSettings::default();
        assert_eq!(settings.timeout(), Duration::from_secs(1));
        assert_eq!(settings.workers, 50);
        assert_eq!(settings.pace_delay(), Duration::from_secs(2));
        assert_eq!(settings.output, OutputFormat::Plain);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let file = write_settings(r#"{ "workers": 200, "output": "json" }"#);
        let settings = ScanSettings::load_from(file.path()).unwrap();

        assert_eq!(settings.workers, 200);
        assert_eq!(settings.output, OutputFormat::Json);
        assert_eq!(settings.timeout_ms, 1000);
        assert!(!settings.verbose);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let file = write_settings("{ not json");
        let err = ScanSettings::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScanSettings::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = ScanSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: ScanSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
