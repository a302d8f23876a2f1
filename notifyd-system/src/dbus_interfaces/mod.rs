//! D-Bus interfaces served by the daemon.

pub mod hints;
pub mod notifications_server;

pub use hints::decode_hints;
pub use notifications_server::NotificationsServer;
