//! Notification lifecycle: entities, the sorted active set, expiry and the service.

pub mod entity;
pub mod errors;
pub mod events;
pub mod expiry;
pub mod service;
pub mod store;
pub mod types;

pub use entity::{Action, Notification};
pub use errors::NotificationError;
pub use events::{NotificationEvent, StoreEvent};
pub use expiry::{ExpiryScheduler, ExpiryTarget};
pub use service::{DefaultNotificationService, NotificationService};
pub use store::{display_order, NotificationView};
pub use types::{
    CloseReason, Hints, ImageData, NotificationId, NotificationImage, NotificationInput, ServerInformation, Urgency,
    CAPABILITIES, SPEC_VERSION,
};
