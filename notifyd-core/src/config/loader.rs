//! Configuration loading.
//!
//! [`ConfigLoader::load`] locates `notifyd.toml`, parses it and validates the
//! result. The lookup order is:
//!
//! 1. the path in `$NOVADE_NOTIFYD_CONFIG`, if set and non-empty;
//! 2. `notifyd.toml` inside the application config directory
//!    (see [`get_app_config_dir`]).
//!
//! A missing or empty file yields the default configuration. Validation
//! normalizes the log level and format, checks the daemon limits and resolves a
//! relative log file path against the application state directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::NotifydConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as notifyd_fs;
use crate::utils::paths::{get_app_config_dir, get_app_state_dir};

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "NOVADE_NOTIFYD_CONFIG";

/// File name looked up inside the application config directory.
pub const CONFIG_FILE_NAME: &str = "notifyd.toml";

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the daemon configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] if the file exists but cannot be read.
    /// - [`ConfigError::ParseError`] if the TOML is malformed or has unknown keys.
    /// - [`ConfigError::ValidationError`] if a value is out of range.
    /// - [`ConfigError::DirectoryUnavailable`] if the config or state directory cannot be resolved.
    pub fn load() -> Result<NotifydConfig, CoreError> {
        let path = Self::config_path()?;
        Self::load_from_path(&path)
    }

    /// Returns the path `load()` reads from.
    pub fn config_path() -> Result<PathBuf, CoreError> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(get_app_config_dir()?.join(CONFIG_FILE_NAME)),
        }
    }

    /// Loads and validates the configuration stored at `path`.
    ///
    /// A file that does not exist is not an error: defaults are used.
    pub fn load_from_path(path: &Path) -> Result<NotifydConfig, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "Loaded configuration file");
                Self::load_from_str(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No configuration file, using defaults");
                let mut config = NotifydConfig::default();
                Self::validate_config(&mut config)?;
                Ok(config)
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })),
        }
    }

    /// Parses and validates configuration from a TOML string.
    pub fn load_from_str(content: &str) -> Result<NotifydConfig, CoreError> {
        let mut config = if content.trim().is_empty() {
            NotifydConfig::default()
        } else {
            toml::from_str(content).map_err(ConfigError::ParseError)?
        };
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Validates the configuration in place.
    ///
    /// Log level and format are lowercased. A relative `logging.file_path` is
    /// made absolute against [`get_app_state_dir`], and the parent directory of
    /// the log file is created.
    fn validate_config(config: &mut NotifydConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level_lower,
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => config.logging.format = format_lower,
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if config.daemon.event_capacity == 0 {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "daemon.event_capacity must be greater than 0".to_string(),
            )));
        }
        if config.daemon.popup_window_ms == 0 {
            return Err(CoreError::Config(ConfigError::ValidationError(
                "daemon.popup_window_ms must be greater than 0".to_string(),
            )));
        }

        if let Some(file_path) = &config.logging.file_path {
            let absolute_path = if file_path.is_absolute() {
                file_path.clone()
            } else {
                get_app_state_dir()?.join(file_path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
                    notifyd_fs::ensure_dir_exists(parent_dir)?;
                }
            }
            config.logging.file_path = Some(absolute_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BusKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn empty_content_yields_defaults() {
        let config = ConfigLoader::load_from_str("   \n").unwrap();
        assert_eq!(config, NotifydConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from_path(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, NotifydConfig::default());
    }

    #[test]
    fn level_and_format_are_normalized() {
        let config = ConfigLoader::load_from_str(
            r#"
            [logging]
            level = "DEBUG"
            format = "Json"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn daemon_section_is_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[daemon]\nbus = \"system\"\nevent_capacity = 8\npopup_window_ms = 2500"
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.daemon.bus, BusKind::System);
        assert_eq!(config.daemon.event_capacity, 8);
        assert_eq!(config.daemon.popup_window_ms, 2500);
    }

    #[test]
    fn absolute_log_path_gets_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs/notifyd.log");
        let content = format!("[logging]\nfile_path = {:?}\n", log_path.display().to_string());

        let config = ConfigLoader::load_from_str(&content).unwrap();
        assert_eq!(config.logging.file_path, Some(log_path.clone()));
        assert!(log_path.parent().unwrap().is_dir());
    }

    #[rstest]
    #[case("[logging]\nlevel = \"verbose\"\n", "Invalid log level")]
    #[case("[logging]\nformat = \"xml\"\n", "Invalid log format")]
    #[case("[daemon]\nevent_capacity = 0\n", "event_capacity")]
    #[case("[daemon]\npopup_window_ms = 0\n", "popup_window_ms")]
    fn invalid_values_are_rejected(#[case] content: &str, #[case] expected: &str) {
        match ConfigLoader::load_from_str(content) {
            Err(CoreError::Config(ConfigError::ValidationError(msg))) => {
                assert!(msg.contains(expected), "unexpected message: {}", msg)
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let result = ConfigLoader::load_from_str("[daemon]\nmax_popups = 3\n");
        assert!(matches!(result, Err(CoreError::Config(ConfigError::ParseError(_)))));
    }
}
