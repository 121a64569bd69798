// SPDX-License-Identifier: MPL-2.0
//! This module handles the notification runtime configuration, including loading
//! and saving tunables to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use toastline::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.warning_ms = 10_000;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded_config = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded_config.warning_ms, 10_000);
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

use crate::error::Result;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Toastline";

/// Tunables for the notification runtime. Every field falls back to its
/// default when missing from the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of live notifications before the oldest is evicted.
    pub max_active: usize,
    pub success_ms: u64,
    pub info_ms: u64,
    pub warning_ms: u64,
    pub stagger_base_ms: u64,
    pub stagger_step_ms: u64,
    pub exit_grace_ms: u64,
    pub progress_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_active: DEFAULT_MAX_ACTIVE,
            success_ms: DEFAULT_SUCCESS_MS,
            info_ms: DEFAULT_INFO_MS,
            warning_ms: DEFAULT_WARNING_MS,
            stagger_base_ms: DEFAULT_STAGGER_BASE_MS,
            stagger_step_ms: DEFAULT_STAGGER_STEP_MS,
            exit_grace_ms: DEFAULT_EXIT_GRACE_MS,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Clamps values that would make the runtime degenerate.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.max_active = self.max_active.max(MIN_MAX_ACTIVE);
        self.progress_interval_ms = self.progress_interval_ms.max(MIN_PROGRESS_INTERVAL_MS);
        self
    }

    /// Cosmetic enter delay for a notification at queue position `index`.
    pub fn stagger_delay(&self, index: usize) -> Duration {
        let steps = u64::try_from(index).unwrap_or(u64::MAX);
        Duration::from_millis(
            self.stagger_base_ms
                .saturating_add(steps.saturating_mul(self.stagger_step_ms)),
        )
    }

    pub fn exit_grace(&self) -> Duration {
        Duration::from_millis(self.exit_grace_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(MIN_PROGRESS_INTERVAL_MS))
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
        Config::default()
    });
    Ok(config.normalized())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_durations() {
        let config = Config {
            warning_ms: 9_000,
            max_active: 3,
            ..Config::default()
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "success_ms = 1500\n").expect("failed to write toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded.success_ms, 1_500);
        assert_eq!(loaded.warning_ms, DEFAULT_WARNING_MS);
        assert_eq!(loaded.max_active, DEFAULT_MAX_ACTIVE);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "max_active = 0\nprogress_interval_ms = 0\n")
            .expect("failed to write toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded.max_active, MIN_MAX_ACTIVE);
        assert_eq!(loaded.progress_interval_ms, MIN_PROGRESS_INTERVAL_MS);
    }

    #[test]
    fn stagger_delay_grows_per_position() {
        let config = Config::default();
        assert_eq!(config.stagger_delay(0), Duration::from_millis(50));
        assert_eq!(config.stagger_delay(1), Duration::from_millis(150));
        assert_eq!(config.stagger_delay(4), Duration::from_millis(450));
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let err = load_from_path(&temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
