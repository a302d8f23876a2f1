//! Logging setup for the notification daemon.
//!
//! Built on `tracing`. A console layer is always installed; a daily-rolling
//! file layer is added when [`LoggingConfig::file_path`] is set. Both layers
//! use the configured level and format.

use crate::config::LoggingConfig;
use crate::error::{CoreError, LoggingError};
use crate::utils;

use once_cell::sync::Lazy;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps the file writer alive so buffered lines are flushed on shutdown.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `info`).
///
/// Used before the configuration is known, or when loading it failed.
/// Does nothing if a global subscriber is already set.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn parse_level(level: &str) -> Result<Level, CoreError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(CoreError::Logging(LoggingError::InitializationFailure(format!(
            "Invalid log level in config: {}",
            other
        )))),
    }
}

fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), CoreError> {
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    utils::fs::ensure_dir_exists(directory)?;

    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("notifyd.log"));
    let file_appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer: BoxedLayer = if format.eq_ignore_ascii_case("json") {
        fmt::layer().json().with_writer(writer).with_ansi(false).boxed()
    } else {
        fmt::layer().with_writer(writer).with_ansi(false).boxed()
    };
    Ok((layer, guard))
}

/// Installs the global subscriber described by `config`.
///
/// With `is_reload` set, a failure to replace an existing subscriber is
/// reported on stderr and treated as success.
///
/// # Errors
///
/// [`LoggingError::InitializationFailure`] if the level is invalid or, on a
/// first initialization, if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), CoreError> {
    let level = parse_level(&config.level)?;

    let stdout_layer: BoxedLayer = if config.format.eq_ignore_ascii_case("json") {
        fmt::layer()
            .json()
            .with_writer(stdout)
            .with_ansi(false)
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed()
    } else {
        fmt::layer()
            .with_writer(stdout)
            .with_ansi(atty::is(atty::Stream::Stdout))
            .with_filter(EnvFilter::new(level.to_string()))
            .boxed()
    };

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer];
    let mut new_guard = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &config.format)?;
        layers.push(file_layer.with_filter(EnvFilter::new(level.to_string())).boxed());
        new_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    match LOG_WORKER_GUARD.lock() {
        Ok(mut slot) => *slot = new_guard,
        Err(poisoned) => *poisoned.into_inner() = new_guard,
    }

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_reload => {
            eprintln!("[INFO] Logging re-initialization left the previous subscriber in place: {}", e);
            Ok(())
        }
        Err(e) => Err(CoreError::Logging(LoggingError::InitializationFailure(format!(
            "Failed to set global tracing subscriber: {}",
            e
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn minimal_logging_can_be_called_twice() {
        init_minimal_logging();
        init_minimal_logging();
        tracing::info!("minimal logging active");
    }

    #[test]
    fn file_layer_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("nested/logs/notifyd.log");

        let (_layer, _guard) = create_file_layer(&log_path, "json").unwrap();
        assert!(log_path.parent().unwrap().is_dir());
    }

    #[test]
    fn invalid_level_is_rejected_before_install() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        match init_logging(&config, false) {
            Err(CoreError::Logging(LoggingError::InitializationFailure(msg))) => assert!(msg.contains("loud")),
            other => panic!("expected initialization failure, got {:?}", other),
        }
    }

    #[test]
    fn reload_tolerates_existing_subscriber() {
        init_minimal_logging();
        let config = LoggingConfig::default();
        assert!(init_logging(&config, true).is_ok());
    }
}
