use serde::Serialize;

use super::types::{CloseReason, NotificationId};

/// Lifecycle events delivered to bus clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NotificationEvent {
    Closed {
        id: NotificationId,
        reason: CloseReason,
    },
    ActionInvoked {
        id: NotificationId,
        action_key: String,
    },
}

/// Changes to the sorted projection. `position` is the index in the
/// projection before removal or after insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StoreEvent {
    Added { id: NotificationId, position: usize },
    Removed { id: NotificationId, position: usize },
}

impl NotificationEvent {
    pub fn notification_id(&self) -> NotificationId {
        match self {
            NotificationEvent::Closed { id, .. } | NotificationEvent::ActionInvoked { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_event_serializes_with_reason_name() {
        let event = NotificationEvent::Closed {
            id: 4,
            reason: CloseReason::Expired,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({ "Closed": { "id": 4, "reason": "Expired" } }));
        assert_eq!(event.notification_id(), 4);
    }
}
