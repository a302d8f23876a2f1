//! Default configuration values.
//!
//! These functions back the `serde` `default` attributes on the configuration
//! structures so that a missing file, section or key falls back to a sensible value.

use crate::config::{BusKind, DaemonConfig, LoggingConfig};
use std::path::PathBuf;

/// Default `[logging]` section, used when the section is missing.
pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// Returns the default log level string (`"info"`).
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

/// Returns the default log file path (`None`, console only).
pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// Returns the default log format string (`"text"`).
pub(super) fn default_log_format() -> String {
    "text".to_string()
}

/// Default `[daemon]` section, used when the section is missing.
pub(super) fn default_daemon_config() -> DaemonConfig {
    DaemonConfig {
        bus: default_bus(),
        event_capacity: default_event_capacity(),
        popup_window_ms: default_popup_window_ms(),
    }
}

/// Notifications are a per-user service, so the session bus is the default.
pub(super) fn default_bus() -> BusKind {
    BusKind::Session
}

/// Capacity of the lifecycle and store-change broadcast channels.
pub(super) fn default_event_capacity() -> usize {
    64
}

/// Window of the "recent" projection used by popup surfaces.
pub(super) fn default_popup_window_ms() -> u64 {
    5_000
}
