//! Active notification set and its sorted projection.
//!
//! The projection is kept sorted on every insert and remove, so readers never
//! pay for a re-sort and never observe a stale order. Every change is
//! broadcast as a [`StoreEvent`] while the write lock is still held, which
//! keeps event order identical to mutation order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;

use super::entity::Notification;
use super::errors::NotificationError;
use super::events::StoreEvent;
use super::service::Registry;
use super::types::NotificationId;

/// Display order: higher urgency first, then newer first.
///
/// Recency is the id, which is allocated in creation order under the store
/// lock. `time_received` follows the wall clock and is only used for display
/// and the popup window.
pub fn display_order(a: &Notification, b: &Notification) -> Ordering {
    b.urgency().cmp(&a.urgency()).then_with(|| b.id.cmp(&a.id))
}

pub(crate) struct NotificationStore {
    by_id: HashMap<NotificationId, Arc<Notification>>,
    sorted: Vec<Arc<Notification>>,
    last_id: NotificationId,
    changes: broadcast::Sender<StoreEvent>,
}

impl NotificationStore {
    pub(crate) fn new(event_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(event_capacity);
        Self {
            by_id: HashMap::new(),
            sorted: Vec::new(),
            last_id: 0,
            changes,
        }
    }

    /// Hands out the next id. Ids start at 1 and are never reused.
    pub(crate) fn allocate_id(&mut self) -> Result<NotificationId, NotificationError> {
        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| NotificationError::Internal("notification id space exhausted".to_string()))?;
        self.last_id = next;
        Ok(next)
    }

    pub(crate) fn insert(&mut self, notification: Arc<Notification>) {
        let id = notification.id;
        let position = self
            .sorted
            .partition_point(|existing| display_order(existing, &notification) == Ordering::Less);
        self.sorted.insert(position, notification.clone());
        self.by_id.insert(id, notification);
        let _ = self.changes.send(StoreEvent::Added { id, position });
    }

    pub(crate) fn remove(&mut self, id: NotificationId) -> Option<Arc<Notification>> {
        let removed = self.by_id.remove(&id)?;
        if let Some(position) = self.sorted.iter().position(|n| n.id == id) {
            self.sorted.remove(position);
            let _ = self.changes.send(StoreEvent::Removed { id, position });
        }
        Some(removed)
    }

    pub(crate) fn get(&self, id: NotificationId) -> Option<&Arc<Notification>> {
        self.by_id.get(&id)
    }

    pub(crate) fn sorted(&self) -> &[Arc<Notification>] {
        &self.sorted
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.changes.subscribe()
    }
}

/// Read-only handle on the sorted projection for presentation surfaces.
///
/// Obtained from [`NotificationService::sorted_view`](super::service::NotificationService::sorted_view).
#[derive(Clone)]
pub struct NotificationView {
    registry: Arc<Registry>,
    popup_window: Duration,
}

impl NotificationView {
    pub(crate) fn new(registry: Arc<Registry>, popup_window: Duration) -> Self {
        Self { registry, popup_window }
    }

    /// The active notifications in display order.
    pub fn snapshot(&self) -> Vec<Arc<Notification>> {
        self.registry.store().read().sorted().to_vec()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.registry.store().read().subscribe()
    }

    /// A snapshot plus a receiver that sees every change made after it.
    pub fn snapshot_and_subscribe(&self) -> (Vec<Arc<Notification>>, broadcast::Receiver<StoreEvent>) {
        let store = self.registry.store().read();
        (store.sorted().to_vec(), store.subscribe())
    }

    /// Notifications received within the configured popup window, in display order.
    pub fn recent(&self) -> Vec<Arc<Notification>> {
        self.recent_within(self.popup_window)
    }

    pub fn recent_within(&self, window: Duration) -> Vec<Arc<Notification>> {
        let cutoff = chrono::Duration::from_std(window)
            .ok()
            .and_then(|window| Utc::now().checked_sub_signed(window));
        self.registry
            .store()
            .read()
            .sorted()
            .iter()
            .filter(|n| cutoff.map_or(true, |cutoff| n.time_received > cutoff))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: NotificationId) -> Option<Arc<Notification>> {
        self.registry.store().read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.registry.store().read().sorted().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn popup_window(&self) -> Duration {
        self.popup_window
    }
}
