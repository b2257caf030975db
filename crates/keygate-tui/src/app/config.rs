//! TUI configuration persistence
//!
//! Saves and loads settings such as the credential file location and the
//! session timeout.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration directory under ~/.config
const CONFIG_DIR_NAME: &str = "keygate";

/// Credential store file name
const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Log file name
const LOG_FILE_NAME: &str = "keygate.log";

/// TUI configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TuiConfig {
    /// Where enrolled users and PIN hashes live
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    /// Idle time before a signed-in session ends
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// How long before expiry the countdown turns into a warning
    #[serde(default = "default_session_warning")]
    pub session_warning_secs: u64,

    /// UI refresh interval
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Use the high-contrast palette
    #[serde(default)]
    pub high_contrast: bool,
}

fn default_credentials_path() -> PathBuf {
    TuiConfig::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CREDENTIALS_FILE_NAME)
}

fn default_session_timeout() -> u64 {
    5 * 60
}

fn default_session_warning() -> u64 {
    60
}

fn default_tick_rate() -> u64 {
    100
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            session_timeout_secs: default_session_timeout(),
            session_warning_secs: default_session_warning(),
            tick_rate_ms: default_tick_rate(),
            high_contrast: false,
        }
    }
}

impl TuiConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        // Try XDG_CONFIG_HOME first, then fall back to ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join(CONFIG_DIR_NAME));
        }

        dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
    }

    /// Get the full config file path
    pub fn config_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the log file path
    pub fn log_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(LOG_FILE_NAME))
    }

    /// Load configuration from the default location
    ///
    /// Returns default configuration if file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_file_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, contents).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Session timeout as a duration
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Session warning period as a duration
    pub fn session_warning(&self) -> Duration {
        Duration::from_secs(self.session_warning_secs)
    }

    /// Tick rate as a duration, never below 10ms
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.credentials_path.ends_with("credentials.json"));
        assert_eq!(config.session_timeout(), Duration::from_secs(300));
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
        assert!(!config.high_contrast);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = TuiConfig {
            credentials_path: PathBuf::from("/srv/keygate/users.json"),
            session_timeout_secs: 120,
            session_warning_secs: 30,
            tick_rate_ms: 50,
            high_contrast: true,
        };
        config.save_to(&path).unwrap();

        assert_eq!(TuiConfig::load_from(&path), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "session_timeout_secs": 30 }"#).unwrap();

        let config = TuiConfig::load_from(&path);
        assert_eq!(config.session_timeout_secs, 30);
        assert_eq!(config.tick_rate_ms, 100);
    }

    #[test]
    fn test_garbage_file_falls_back() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(TuiConfig::load_from(&path).session_timeout_secs, 300);
    }

    #[test]
    fn test_tick_rate_floor() {
        let config = TuiConfig {
            tick_rate_ms: 0,
            ..TuiConfig::default()
        };
        assert_eq!(config.tick_rate(), Duration::from_millis(10));
    }
}
