use thiserror::Error;

use super::types::NotificationId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Action list must hold key/label pairs, got {len} entries.")]
    InvalidActionList { len: usize },

    #[error("Action '{action_key}' not found for notification ID '{notification_id}'.")]
    ActionNotFound {
        notification_id: NotificationId,
        action_key: String,
    },

    #[error("Internal notification error: {0}")]
    Internal(String),
}
