// Runtime configuration loaded from YAML

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const APP_DIR: &str = "catalogstore";
const CONFIG_FILE: &str = "config.yaml";

/// Settings for list views and the command line front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Quiet period before a typed query is applied
    pub debounce_ms: u64,
    /// Simulated latency for the built-in datasets
    pub load_latency_ms: u64,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
    /// Directory holding `<collection>.jsonl` files
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            load_latency_ms: 0,
            log_level: "info".to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user file is used
    /// when present and defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to the defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).context("Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/catalogstore/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn load_latency(&self) -> Duration {
        Duration::from_millis(self.load_latency_ms)
    }

    pub fn tracing_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| eyre::eyre!("Invalid log level: {}", self.log_level))
    }

    fn validate(&self) -> Result<()> {
        self.tracing_level()?;
        if self.debounce_ms > 10_000 {
            return Err(eyre::eyre!("debounce_ms too large: {} (max 10000)", self.debounce_ms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.load_latency(), Duration::ZERO);
        assert_eq!(config.tracing_level().unwrap(), tracing::Level::INFO);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("debounce_ms: 150\n").unwrap();
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.log_level, "info");

        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_values() {
        assert!(Config::from_yaml("debounce: 100\n").is_err());
        assert!(Config::from_yaml("log_level: loud\n").is_err());
        assert!(Config::from_yaml("debounce_ms: 60000\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "log_level: debug\ndata_dir: /srv/catalog\nload_latency_ms: 800\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.tracing_level().unwrap(), tracing::Level::DEBUG);
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/catalog")));
        assert_eq!(config.load_latency(), Duration::from_millis(800));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(&temp.path().join("absent.yaml"))).is_err());
    }
}
