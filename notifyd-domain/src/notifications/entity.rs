//! The notification and action entities handed to presentation surfaces.
//!
//! Both keep a weak link to the registry that owns the live set so that a
//! surface can dismiss a notification or invoke an action without holding a
//! service handle. Once the service is dropped these calls become no-ops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

use chrono::{DateTime, Utc};

use super::errors::NotificationError;
use super::service::Registry;
use super::types::{CloseReason, Hints, NotificationId, NotificationInput, Urgency};

/// A response the user can pick on a notification.
#[derive(Debug, Clone)]
pub struct Action {
    pub key: String,
    pub label: String,
    pub notification_id: NotificationId,
    registry: Weak<Registry>,
}

impl Action {
    /// Emits `ActionInvoked` for the owning notification.
    ///
    /// Returns `Ok(false)` if the notification is no longer active. The
    /// notification itself is left untouched.
    pub fn invoke(&self) -> Result<bool, NotificationError> {
        match self.registry.upgrade() {
            Some(registry) => registry.invoke_action(self.notification_id, &self.key),
            None => Ok(false),
        }
    }
}

/// Splits a flat `[key, label, key, label, ...]` list into pairs.
pub(crate) fn pair_actions(flat: &[String]) -> Result<Vec<(String, String)>, NotificationError> {
    if flat.len() % 2 != 0 {
        return Err(NotificationError::InvalidActionList { len: flat.len() });
    }
    Ok(flat
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}

#[derive(Debug)]
pub struct Notification {
    pub id: NotificationId,
    pub app_name: String,
    pub app_icon: String,
    pub summary: String,
    pub body: String,
    pub actions: Vec<Action>,
    pub hints: Hints,
    pub expire_timeout: i32,
    pub time_received: DateTime<Utc>,
    pub replaces_id: NotificationId,
    dismissed: AtomicBool,
    registry: Weak<Registry>,
}

impl Notification {
    pub(crate) fn new(
        id: NotificationId,
        input: NotificationInput,
        actions: Vec<(String, String)>,
        time_received: DateTime<Utc>,
        registry: Weak<Registry>,
    ) -> Self {
        let actions = actions
            .into_iter()
            .map(|(key, label)| Action {
                key,
                label,
                notification_id: id,
                registry: registry.clone(),
            })
            .collect();

        Self {
            id,
            app_name: input.app_name,
            app_icon: input.app_icon,
            summary: input.summary,
            body: input.body,
            actions,
            hints: input.hints,
            expire_timeout: input.expire_timeout,
            time_received,
            replaces_id: input.replaces_id,
            dismissed: AtomicBool::new(false),
            registry,
        }
    }

    pub fn urgency(&self) -> Urgency {
        self.hints.urgency
    }

    pub fn action(&self, key: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.key == key)
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed.load(Ordering::Acquire)
    }

    /// Dismisses on behalf of the user. See [`Notification::dismiss_with`].
    pub fn dismiss(&self) -> bool {
        self.dismiss_with(CloseReason::DismissedByUser)
    }

    /// Removes the notification from the active set and emits `NotificationClosed`.
    ///
    /// Returns `true` only for the call that performed the dismissal.
    pub fn dismiss_with(&self, reason: CloseReason) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.close(self.id, reason),
            None => false,
        }
    }

    /// Flips the guard. Must be called with the store write lock held.
    pub(crate) fn mark_dismissed(&self) -> bool {
        !self.dismissed.swap(true, Ordering::AcqRel)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn actions_are_paired_in_order() {
        let pairs = pair_actions(&strings(&["default", "OK", "cancel", "Cancel"])).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("default".to_string(), "OK".to_string()),
                ("cancel".to_string(), "Cancel".to_string()),
            ]
        );
        assert!(pair_actions(&[]).unwrap().is_empty());
    }

    #[test]
    fn odd_action_list_is_rejected() {
        assert_eq!(
            pair_actions(&strings(&["default", "OK", "orphan"])),
            Err(NotificationError::InvalidActionList { len: 3 })
        );
    }

    #[test]
    fn detached_notification_cannot_be_dismissed() {
        let notification = test_support::detached(1, Urgency::Normal, Utc::now());
        assert!(!notification.dismiss());
        assert!(!notification.is_dismissed());
    }

    #[test]
    fn guard_flips_once() {
        let notification = test_support::detached(1, Urgency::Low, Utc::now());
        assert!(notification.mark_dismissed());
        assert!(!notification.mark_dismissed());
        assert!(notification.is_dismissed());
    }

    #[test]
    fn actions_carry_owner_id() {
        let input = NotificationInput {
            actions: strings(&["default", "Open"]),
            ..NotificationInput::default()
        };
        let pairs = pair_actions(&input.actions).unwrap();
        let notification = Notification::new(9, input, pairs, Utc::now(), Weak::new());
        let action = notification.action("default").unwrap();
        assert_eq!(action.label, "Open");
        assert_eq!(action.notification_id, 9);
        assert_eq!(action.invoke(), Ok(false));
        assert!(notification.action("missing").is_none());
    }
}
