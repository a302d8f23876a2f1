use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use novade_notifyd_core::config::DaemonConfig;

use super::entity::{pair_actions, Notification};
use super::errors::NotificationError;
use super::events::NotificationEvent;
use super::expiry::{ExpiryScheduler, ExpiryTarget};
use super::store::{NotificationStore, NotificationView};
use super::types::{CloseReason, NotificationId, NotificationInput, ServerInformation, CAPABILITIES};

// --- NotificationService Trait ---

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Posts a notification and returns its id.
    ///
    /// An active `replaces_id` is closed with [`CloseReason::ClosedByRequest`]
    /// first. An odd-length action list fails before any state changes.
    async fn create_notification(&self, input: NotificationInput) -> Result<NotificationId, NotificationError>;

    /// Returns `true` if this call dismissed the notification. Unknown or
    /// already closed ids are ignored.
    async fn close_notification(&self, id: NotificationId, reason: CloseReason) -> bool;

    async fn invoke_action(&self, id: NotificationId, action_key: &str) -> Result<bool, NotificationError>;
    async fn get_notification(&self, id: NotificationId) -> Option<Arc<Notification>>;
    fn capabilities(&self) -> Vec<String>;
    fn server_information(&self) -> ServerInformation;
    fn sorted_view(&self) -> NotificationView;
    fn subscribe_to_notification_events(&self) -> broadcast::Receiver<NotificationEvent>;
}

// --- Registry ---

/// Owns the active set, the lifecycle event channel and the expiry task.
///
/// Shared by the service and every view, and held weakly by the expiry task
/// and every entity, so that all dismissal paths funnel through
/// [`Registry::close`]. The expiry task runs until the last strong reference
/// is gone.
pub(crate) struct Registry {
    store: RwLock<NotificationStore>,
    event_publisher: broadcast::Sender<NotificationEvent>,
    expiry: ExpiryScheduler,
}

impl Registry {
    fn new(event_capacity: usize, runtime: &Handle) -> Arc<Self> {
        let (event_publisher, _) = broadcast::channel(event_capacity);
        Arc::new_cyclic(|registry: &Weak<Registry>| {
            let target: Weak<dyn ExpiryTarget> = registry.clone();
            Self {
                store: RwLock::new(NotificationStore::new(event_capacity)),
                event_publisher,
                expiry: ExpiryScheduler::spawn(runtime, target),
            }
        })
    }

    pub(crate) fn store(&self) -> &RwLock<NotificationStore> {
        &self.store
    }

    fn publish_event(&self, event: NotificationEvent) {
        if self.event_publisher.send(event).is_err() {
            debug!("No subscribers for notification event");
        }
    }

    fn create(self: &Arc<Self>, input: NotificationInput) -> Result<Arc<Notification>, NotificationError> {
        let actions = pair_actions(&input.actions)?;

        if input.replaces_id != 0 && self.close(input.replaces_id, CloseReason::ClosedByRequest) {
            debug!(replaced = input.replaces_id, "Closed notification being replaced");
        }

        let mut store = self.store.write();
        let id = store.allocate_id()?;
        let notification = Arc::new(Notification::new(id, input, actions, Utc::now(), Arc::downgrade(self)));
        store.insert(notification.clone());
        Ok(notification)
    }

    /// Single dismissal path. The guard flip, removal and event happen under the write lock.
    pub(crate) fn close(&self, id: NotificationId, reason: CloseReason) -> bool {
        let mut store = self.store.write();
        let claimed = match store.get(id) {
            Some(notification) => notification.mark_dismissed(),
            None => false,
        };
        if !claimed {
            debug!(id, ?reason, "Close ignored, notification not active");
            return false;
        }
        store.remove(id);
        self.publish_event(NotificationEvent::Closed { id, reason });
        info!(id, reason = reason.code(), "Notification closed");
        true
    }

    pub(crate) fn invoke_action(&self, id: NotificationId, action_key: &str) -> Result<bool, NotificationError> {
        let store = self.store.read();
        let Some(notification) = store.get(id) else {
            debug!(id, action_key, "Action invoked on inactive notification");
            return Ok(false);
        };
        if notification.action(action_key).is_none() {
            return Err(NotificationError::ActionNotFound {
                notification_id: id,
                action_key: action_key.to_string(),
            });
        }
        self.publish_event(NotificationEvent::ActionInvoked {
            id,
            action_key: action_key.to_string(),
        });
        info!(id, action_key, "Action invoked");
        Ok(true)
    }
}

impl ExpiryTarget for Registry {
    fn expire(&self, id: NotificationId) {
        self.close(id, CloseReason::Expired);
    }
}

// --- DefaultNotificationService Implementation ---

pub struct DefaultNotificationService {
    registry: Arc<Registry>,
    popup_window: Duration,
}

impl DefaultNotificationService {
    /// Builds the service and starts its expiry task on the current tokio runtime.
    ///
    /// Views taken from the service keep the expiry task alive after the
    /// service itself is dropped.
    ///
    /// # Errors
    ///
    /// [`NotificationError::Internal`] when called outside a tokio runtime.
    pub fn new(config: &DaemonConfig) -> Result<Self, NotificationError> {
        let runtime = Handle::try_current()
            .map_err(|e| NotificationError::Internal(format!("expiry task needs a tokio runtime: {}", e)))?;
        Ok(Self {
            registry: Registry::new(config.event_capacity.max(1), &runtime),
            popup_window: Duration::from_millis(config.popup_window_ms),
        })
    }
}

#[async_trait]
impl NotificationService for DefaultNotificationService {
    async fn create_notification(&self, input: NotificationInput) -> Result<NotificationId, NotificationError> {
        let app_name = input.app_name.clone();
        let notification = self.registry.create(input).map_err(|e| {
            warn!(app_name = %app_name, error = %e, "Rejected notification");
            e
        })?;

        // The store insert above must precede scheduling so a 0 ms expiry finds the entry.
        if let Err(e) = self.registry.expiry.schedule(notification.id, notification.expire_timeout) {
            warn!(
                id = notification.id,
                expire_timeout = notification.expire_timeout,
                error = %e,
                "Notification will not expire"
            );
        }
        info!(
            id = notification.id,
            app_name = %notification.app_name,
            urgency = notification.urgency().level(),
            expire_timeout = notification.expire_timeout,
            "Notification posted"
        );
        Ok(notification.id)
    }

    async fn close_notification(&self, id: NotificationId, reason: CloseReason) -> bool {
        self.registry.close(id, reason)
    }

    async fn invoke_action(&self, id: NotificationId, action_key: &str) -> Result<bool, NotificationError> {
        self.registry.invoke_action(id, action_key)
    }

    async fn get_notification(&self, id: NotificationId) -> Option<Arc<Notification>> {
        self.registry.store().read().get(id).cloned()
    }

    fn capabilities(&self) -> Vec<String> {
        CAPABILITIES.iter().map(|c| c.to_string()).collect()
    }

    fn server_information(&self) -> ServerInformation {
        ServerInformation::current()
    }

    fn sorted_view(&self) -> NotificationView {
        NotificationView::new(self.registry.clone(), self.popup_window)
    }

    fn subscribe_to_notification_events(&self) -> broadcast::Receiver<NotificationEvent> {
        self.registry.event_publisher.subscribe()
    }
}
