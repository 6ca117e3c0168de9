use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub wear: WearThresholds,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_upower_device")]
    pub upower_device: String,
}

impl FallbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_secs: default_timeout_secs(),
            upower_device: default_upower_device(),
        }
    }
}

/// Upper bounds (exclusive) of each wear bracket, in cycles.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WearThresholds {
    #[serde(default = "default_excellent")]
    pub excellent: i64,
    #[serde(default = "default_good")]
    pub good: i64,
    #[serde(default = "default_moderate")]
    pub moderate: i64,
}

impl Default for WearThresholds {
    fn default() -> Self {
        Self {
            excellent: default_excellent(),
            good: default_good(),
            moderate: default_moderate(),
        }
    }
}

fn default_root() -> PathBuf { PathBuf::from("/") }
fn default_enabled() -> bool { true }
fn default_timeout_secs() -> u64 { 5 }
fn default_upower_device() -> String { "/org/freedesktop/UPower/devices/battery_BAT0".to_string() }
fn default_excellent() -> i64 { 300 }
fn default_good() -> i64 { 500 }
fn default_moderate() -> i64 { 1000 }

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            fallback: FallbackConfig::default(),
            wear: WearThresholds::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("battery-cycle-count").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit`, or the per-user config file when none is given.
    /// Falls back to defaults on any problem.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                Some(path) => {
                    tracing::debug!("No config file at {:?}, using defaults", path);
                    return Self::default();
                }
                None => {
                    tracing::debug!("Could not determine config directory, using defaults");
                    return Self::default();
                }
            },
        };

        match Self::from_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_stock_behaviour() {
        let config = Config::default();
        assert_eq!(config.root, PathBuf::from("/"));
        assert!(config.fallback.enabled);
        assert_eq!(config.fallback.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.fallback.upower_device,
            "/org/freedesktop/UPower/devices/battery_BAT0"
        );
        assert_eq!(config.wear, WearThresholds { excellent: 300, good: 500, moderate: 1000 });
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let td = TempDir::new().unwrap();
        let path = td.path().join("config.toml");
        fs::write(&path, "root = \"/tmp/fake\"\n\n[fallback]\ntimeout_secs = 2\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("/tmp/fake"));
        assert_eq!(config.fallback.timeout_secs, 2);
        assert!(config.fallback.enabled);
        assert_eq!(config.wear.good, 500);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let td = TempDir::new().unwrap();
        let path = td.path().join("config.toml");
        fs::write(&path, "root = [not toml").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
        let config = Config::load(Some(&path));
        assert_eq!(config.root, PathBuf::from("/"));
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let td = TempDir::new().unwrap();
        let path = td.path().join("absent.toml");
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Read { .. })));
    }
}
