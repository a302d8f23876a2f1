//! Forwards lifecycle events from the notification service onto the bus.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use zbus::{Connection, SignalContext};

use novade_notifyd_domain::notifications::NotificationEvent;

use super::manager::NOTIFICATIONS_OBJECT_PATH;
use crate::dbus_interfaces::NotificationsServer;

/// A signal of the `org.freedesktop.Notifications` interface with its wire arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusSignal {
    NotificationClosed { id: u32, reason: u32 },
    ActionInvoked { id: u32, action_key: String },
}

impl From<&NotificationEvent> for BusSignal {
    fn from(event: &NotificationEvent) -> Self {
        match event {
            NotificationEvent::Closed { id, reason } => BusSignal::NotificationClosed {
                id: *id,
                reason: reason.code(),
            },
            NotificationEvent::ActionInvoked { id, action_key } => BusSignal::ActionInvoked {
                id: *id,
                action_key: action_key.clone(),
            },
        }
    }
}

async fn emit(context: &SignalContext<'_>, signal: &BusSignal) -> zbus::Result<()> {
    match signal {
        BusSignal::NotificationClosed { id, reason } => {
            NotificationsServer::notification_closed(context, *id, *reason).await
        }
        BusSignal::ActionInvoked { id, action_key } => {
            NotificationsServer::action_invoked(context, *id, action_key).await
        }
    }
}

/// Spawns a task emitting every received event as a broadcast signal.
///
/// The task ends when the event channel closes. Emission failures are logged
/// and skipped.
pub fn spawn_signal_forwarder(
    connection: Connection,
    mut events: broadcast::Receiver<NotificationEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let context = match SignalContext::new(&connection, NOTIFICATIONS_OBJECT_PATH) {
            Ok(context) => context,
            Err(e) => {
                tracing::error!(error = %e, "Cannot build signal context, signals disabled");
                return;
            }
        };

        loop {
            match events.recv().await {
                Ok(event) => {
                    let signal = BusSignal::from(&event);
                    match emit(&context, &signal).await {
                        Ok(()) => tracing::debug!(?signal, "Signal emitted"),
                        Err(e) => tracing::error!(?signal, error = %e, "Failed to emit signal"),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Signal forwarder lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("Signal forwarder stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use novade_notifyd_domain::notifications::CloseReason;
    use pretty_assertions::assert_eq;

    #[test]
    fn closed_event_carries_reason_code() {
        let event = NotificationEvent::Closed {
            id: 12,
            reason: CloseReason::ClosedByRequest,
        };
        assert_eq!(BusSignal::from(&event), BusSignal::NotificationClosed { id: 12, reason: 3 });
    }

    #[test]
    fn action_event_carries_key() {
        let event = NotificationEvent::ActionInvoked {
            id: 5,
            action_key: "cancel".to_string(),
        };
        assert_eq!(
            BusSignal::from(&event),
            BusSignal::ActionInvoked {
                id: 5,
                action_key: "cancel".to_string()
            }
        );
    }
}
