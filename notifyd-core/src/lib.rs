//! # Notification daemon core (`novade-notifyd-core`)
//!
//! Shared foundations for the notification daemon:
//!
//! - **Error handling**: [`CoreError`] with [`ConfigError`] and [`LoggingError`].
//! - **Configuration**: TOML loading and validation through [`ConfigLoader`].
//! - **Logging**: `tracing` subscriber setup with optional JSON and file output.
//! - **Utilities**: XDG path resolution and directory creation.
//!
//! ```rust,ignore
//! use novade_notifyd_core::{config::ConfigLoader, logging::init_logging, CoreError};
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("notifyd core initialized");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{BusKind, ConfigLoader, DaemonConfig, LoggingConfig, NotifydConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
