//! Error handling for the notification daemon's core layer.
//!
//! The main error type is [`CoreError`], which wraps the more specific
//! [`ConfigError`] and [`LoggingError`]. The domain and system crates define
//! their own error enums and convert into or wrap `CoreError` where needed.
//!
//! # Examples
//!
//! ```rust,ignore
//! use novade_notifyd_core::error::CoreError;
//!
//! fn load_something() -> Result<(), CoreError> {
//!     Err(CoreError::Internal("not yet available".to_string()))
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the notification daemon.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while installing the global `tracing` subscriber.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// Filesystem operations (creating directories, reading files) that failed
    /// outside of configuration or logging I/O.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors not covered by other variants.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed but holds invalid values.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (XDG config/state home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging initialization.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// The global subscriber could not be installed or the config is unusable.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// A log filter directive could not be parsed.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),

    /// An I/O error occurred while preparing a log file.
    #[error("Logging I/O error: {0}")]
    IoError(#[from] io::Error),
}
