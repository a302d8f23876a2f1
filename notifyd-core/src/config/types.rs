//! Configuration data structures.
//!
//! - [`NotifydConfig`]: the root structure, one field per TOML section.
//! - [`LoggingConfig`]: the `[logging]` section.
//! - [`DaemonConfig`]: the `[daemon]` section.
//!
//! Every field has a default from [`super::defaults`], and unknown keys are
//! rejected via `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use novade_notifyd_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let default_log_config = LoggingConfig::default();
/// assert_eq!(default_log_config.level, "info");
/// assert_eq!(default_log_config.file_path, None);
/// assert_eq!(default_log_config.format, "text");
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/notifyd.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/notifyd.log")));
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum log level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// Output format: "text" or "json" (case-insensitive).
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Which message bus the daemon registers on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusKind {
    Session,
    System,
}

/// The `[daemon]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    #[serde(default = "defaults::default_bus")]
    pub bus: BusKind,
    /// Capacity of the lifecycle and store-change broadcast channels. Must be > 0.
    #[serde(default = "defaults::default_event_capacity")]
    pub event_capacity: usize,
    /// How long a notification counts as "recent" for popup surfaces, in milliseconds. Must be > 0.
    #[serde(default = "defaults::default_popup_window_ms")]
    pub popup_window_ms: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        defaults::default_daemon_config()
    }
}

/// Root configuration of the notification daemon.
///
/// ```
/// use novade_notifyd_core::config::{BusKind, NotifydConfig};
///
/// let config: NotifydConfig = toml::from_str(r#"
/// [daemon]
/// bus = "system"
/// "#).unwrap();
/// assert_eq!(config.daemon.bus, BusKind::System);
/// assert_eq!(config.daemon.event_capacity, 64);
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifydConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_daemon_config")]
    pub daemon: DaemonConfig,
}

impl Default for NotifydConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            daemon: DaemonConfig::default(),
        }
    }
}
