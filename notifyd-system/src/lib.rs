//! # NovaDE notification daemon (`novade-notifyd`)
//!
//! Serves `org.freedesktop.Notifications` on D-Bus on top of the domain
//! notification service, and forwards lifecycle events as bus signals.

use std::sync::Arc;

use novade_notifyd_core::config::NotifydConfig;
use novade_notifyd_domain::notifications::{DefaultNotificationService, NotificationService};

pub mod dbus_integration;
pub mod dbus_interfaces;
pub mod error;

pub use dbus_integration::{Availability, DbusServiceManager};
pub use error::SystemError;

/// Builds the notification service and registers it on the configured bus.
///
/// Returns the manager, which must be kept alive while serving, together
/// with the outcome of the name request.
pub async fn start_daemon(config: &NotifydConfig) -> Result<(DbusServiceManager, Availability), SystemError> {
    let service: Arc<dyn NotificationService> = Arc::new(DefaultNotificationService::new(&config.daemon)?);
    let mut manager = DbusServiceManager::connect(config.daemon.bus).await?;
    let availability = manager.serve_notifications(service).await?;
    Ok((manager, availability))
}
