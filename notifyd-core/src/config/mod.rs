//! Configuration management for the notification daemon.
//!
//! - [`types`]: the configuration schema ([`NotifydConfig`], [`LoggingConfig`], [`DaemonConfig`]).
//! - [`defaults`]: default values used by `serde` when keys are missing.
//! - [`loader`]: [`ConfigLoader`], which locates, parses and validates the TOML file.
//!
//! ```rust,ignore
//! use novade_notifyd_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("Bus: {:?}", config.daemon.bus),
//!     Err(e) => {
//!         novade_notifyd_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{BusKind, DaemonConfig, LoggingConfig, NotifydConfig};
