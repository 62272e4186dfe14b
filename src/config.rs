//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::display::Theme;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote sensor endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL; `/api/latest` and `/api/history` are appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Poll cadence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub latest_interval_secs: u64,

    #[serde(default = "default_poll_interval")]
    pub history_interval_secs: u64,

    /// Drop a response that resolves after a newer one already did
    #[serde(default = "default_discard_stale")]
    pub discard_stale_responses: bool,
}

fn default_poll_interval() -> u64 {
    30
}

fn default_discard_stale() -> bool {
    true
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            latest_interval_secs: default_poll_interval(),
            history_interval_secs: default_poll_interval(),
            discard_stale_responses: default_discard_stale(),
        }
    }
}

impl PollingConfig {
    pub fn latest_interval(&self) -> Duration {
        Duration::from_secs(self.latest_interval_secs.max(1))
    }

    pub fn history_interval(&self) -> Duration {
        Duration::from_secs(self.history_interval_secs.max(1))
    }
}

/// Display configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    /// Initial light/dark palette for the chart
    #[serde(default)]
    pub theme: Theme,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Standard config file locations, in search order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("thermowatch").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/thermowatch/config.toml"));
        paths.push(PathBuf::from("./config.toml"));
        paths
    }

    /// Load the first candidate that exists, with environment overrides
    ///
    /// A file that exists but cannot be read or parsed is an error; it is
    /// never skipped in favour of defaults. `Ok(None)` when no candidate exists.
    pub fn load_first(candidates: &[PathBuf]) -> Result<Option<(Self, PathBuf)>, ConfigError> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Ok(Some((Self::load_with_env(path)?, path.clone()))),
            None => Ok(None),
        }
    }

    /// Load from default locations, falling back to environment only
    pub fn load_default() -> Result<Self, ConfigError> {
        Ok(Self::load_first(&Self::search_paths())?
            .map(|(config, _)| config)
            .unwrap_or_else(Self::from_env))
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("THERMOWATCH_BASE_URL") {
            self.source.base_url = url;
        }
        if let Some(secs) = lookup("THERMOWATCH_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.source.request_timeout_secs = s;
            }
        }

        if let Some(theme) = lookup("THERMOWATCH_THEME") {
            if let Ok(t) = theme.parse() {
                self.display.theme = t;
            }
        }

        if let Some(level) = lookup("THERMOWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("THERMOWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Thermowatch Configuration
#
# Environment variables override these settings:
# - THERMOWATCH_BASE_URL
# - THERMOWATCH_TIMEOUT_SECS
# - THERMOWATCH_THEME
# - THERMOWATCH_LOG_LEVEL
# - THERMOWATCH_LOG_FORMAT

[source]
# Base URL of the sensor service (serves /api/latest and /api/history)
base_url = "http://localhost:5000"

# Request timeout in seconds
request_timeout_secs = 10

[polling]
# Seconds between latest-reading fetches
latest_interval_secs = 30

# Seconds between history fetches
history_interval_secs = 30

# Ignore a response that arrives after a newer one already resolved
discard_stale_responses = true

[display]
# Chart palette: light or dark
theme = "dark"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.base_url, "http://localhost:5000");
        assert_eq!(config.polling.latest_interval(), Duration::from_secs(30));
        assert_eq!(config.polling.history_interval(), Duration::from_secs(30));
        assert!(config.polling.discard_stale_responses);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.source.request_timeout_secs, 10);
        assert_eq!(config.display.theme, Theme::Dark);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[polling]\nhistory_interval_secs = 5\n\n[display]\ntheme = \"light\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.polling.history_interval_secs, 5);
        assert_eq!(config.polling.latest_interval_secs, 30);
        assert_eq!(config.display.theme, Theme::Light);
        assert_eq!(config.source.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[polling\nbroken").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_first_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("config.toml");
        std::fs::write(&present, "[source]\nrequest_timeout_secs = 3\n").unwrap();

        let (config, path) = Config::load_first(&[missing.clone(), present.clone()])
            .unwrap()
            .unwrap();
        assert_eq!(path, present);
        assert_eq!(config.source.request_timeout_secs, 3);

        assert!(Config::load_first(&[missing]).unwrap().is_none());
    }

    #[test]
    fn test_broken_candidate_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        let valid = dir.path().join("other.toml");
        std::fs::write(&broken, "[source\nbase_url = ").unwrap();
        std::fs::write(&valid, "").unwrap();

        // The first existing file wins, even when it is malformed
        let result = Config::load_first(&[broken, valid]);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("THERMOWATCH_BASE_URL", "http://10.0.0.7:8000"),
            ("THERMOWATCH_TIMEOUT_SECS", "not-a-number"),
            ("THERMOWATCH_THEME", "light"),
            ("THERMOWATCH_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.source.base_url, "http://10.0.0.7:8000");
        assert_eq!(config.source.request_timeout_secs, 10);
        assert_eq!(config.display.theme, Theme::Light);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let polling = PollingConfig {
            latest_interval_secs: 0,
            ..PollingConfig::default()
        };
        assert_eq!(polling.latest_interval(), Duration::from_secs(1));
    }
}
