// SPDX-License-Identifier: Apache-2.0

//! Configuration management for rbtriage.
//!
//! Provides layered configuration from files and environment variables.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `RBTRIAGE_`)
//! 2. Config file: `<config dir>/rbtriage/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Point the client at a local mock server
//! RBTRIAGE_API__BASE_URL=http://127.0.0.1:8080/api/1 rbtriage recent
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::TriageError;

/// Default Rollbar API root.
pub const DEFAULT_BASE_URL: &str = "https://api.rollbar.com/api/1";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rollbar API settings.
    pub api: ApiConfig,
    /// Output preferences.
    pub output: OutputConfig,
    /// UI preferences.
    pub ui: UiConfig,
}

/// Rollbar API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root URL.
    pub base_url: String,
    /// Overall deadline for one command, in seconds.
    pub timeout_seconds: u64,
    /// TCP connect timeout, in seconds.
    pub connect_timeout_seconds: u64,
    /// Per-request timeout, in seconds.
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
            connect_timeout_seconds: 3,
            request_timeout_seconds: 8,
        }
    }
}

/// Output preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Number of issues listed when `--limit` is not given.
    pub default_limit: i64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

/// UI preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show a spinner while waiting on the API.
    pub progress: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { progress: true }
    }
}

/// Returns the rbtriage configuration directory.
///
/// Respects `XDG_CONFIG_HOME` when set and non-empty, otherwise uses the
/// platform configuration directory.
pub fn config_dir() -> Result<PathBuf, TriageError> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return Ok(PathBuf::from(xdg_config).join("rbtriage"));
    }
    dirs::config_dir()
        .map(|dir| dir.join("rbtriage"))
        .ok_or_else(|| TriageError::Config {
            message: "could not determine user config directory".to_string(),
        })
}

/// Returns the path to the configuration file.
pub fn config_file_path() -> Result<PathBuf, TriageError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Returns the path to the project token store.
pub fn projects_file_path() -> Result<PathBuf, TriageError> {
    Ok(config_dir()?.join("projects.json"))
}

/// Load application configuration from the default locations.
///
/// # Errors
///
/// Returns `TriageError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, TriageError> {
    load_config_from(&config_file_path()?)
}

/// Load application configuration using `path` as the optional config file.
///
/// Environment variables use the prefix `RBTRIAGE_` and a double underscore
/// for nested keys (e.g. `RBTRIAGE_API__TIMEOUT_SECONDS`).
pub fn load_config_from(path: &Path) -> Result<AppConfig, TriageError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("RBTRIAGE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.api.connect_timeout_seconds, 3);
        assert_eq!(config.api.request_timeout_seconds, 8);
        assert_eq!(config.output.default_limit, 10);
        assert!(config.ui.progress);
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://localhost:9999/api/1\"\n\n[output]\ndefault_limit = 25\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9999/api/1");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.output.default_limit, 25);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ntimeout_seconds = 30\n").unwrap();

        unsafe {
            std::env::set_var("RBTRIAGE_API__TIMEOUT_SECONDS", "4");
        }
        let config = load_config_from(&path);
        unsafe {
            std::env::remove_var("RBTRIAGE_API__TIMEOUT_SECONDS");
        }

        assert_eq!(config.unwrap().api.timeout_seconds, 4);
    }

    #[test]
    #[serial]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbroken").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, TriageError::Config { .. }));
    }

    #[test]
    #[serial]
    fn test_config_dir_respects_xdg_config_home() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let dir = config_dir().unwrap();
        let projects = projects_file_path().unwrap();

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert_eq!(dir, PathBuf::from("/custom/config/rbtriage"));
        assert_eq!(
            projects,
            PathBuf::from("/custom/config/rbtriage/projects.json")
        );
    }

    #[test]
    #[serial]
    fn test_config_file_path_name() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let path = config_file_path().unwrap();

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        assert!(path.ends_with("rbtriage/config.toml"));
    }
}
