use thiserror::Error;

use novade_notifyd_core::error::CoreError;
use novade_notifyd_domain::notifications::NotificationError;

use crate::dbus_integration::manager::DbusManagerError;

/// Top-level error of the daemon process.
#[derive(Error, Debug)]
pub enum SystemError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
    #[error("D-Bus error: {0}")]
    Dbus(#[from] DbusManagerError),
    #[error("Notification service error: {0}")]
    Notification(#[from] NotificationError),
}

/// Maps a domain error onto the bus error returned to the caller.
pub fn to_fdo_error(error: NotificationError) -> zbus::fdo::Error {
    match error {
        NotificationError::InvalidActionList { .. } => zbus::fdo::Error::InvalidArgs(error.to_string()),
        other => zbus::fdo::Error::Failed(other.to_string()),
    }
}
