//! Bus connection management and event forwarding.

pub mod manager;
pub mod signals;

pub use manager::{Availability, DbusManagerError, DbusServiceManager, NOTIFICATIONS_BUS_NAME, NOTIFICATIONS_OBJECT_PATH};
pub use signals::{spawn_signal_forwarder, BusSignal};
