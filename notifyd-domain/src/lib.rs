//! # Notification daemon domain (`novade-notifyd-domain`)
//!
//! Bus-independent notification logic: id allocation, create/replace/close
//! semantics, action invocation, timer-driven expiry and the urgency/recency
//! ordered projection consumed by presentation surfaces.
//!
//! ```rust,ignore
//! use novade_notifyd_core::config::DaemonConfig;
//! use novade_notifyd_domain::notifications::{DefaultNotificationService, NotificationInput, NotificationService};
//!
//! let service = DefaultNotificationService::new(&DaemonConfig::default())?;
//! let id = service.create_notification(NotificationInput {
//!     app_name: "Mail".into(),
//!     summary: "New message".into(),
//!     expire_timeout: 5000,
//!     ..Default::default()
//! }).await?;
//! ```

pub mod notifications;

pub use notifications::{
    Action, CloseReason, DefaultNotificationService, Notification, NotificationError, NotificationEvent,
    NotificationId, NotificationInput, NotificationService, NotificationView, StoreEvent, Urgency,
};
