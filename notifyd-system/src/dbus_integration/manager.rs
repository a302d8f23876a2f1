// notifyd-system/src/dbus_integration/manager.rs

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use zbus::fdo::{DBusProxy, RequestNameFlags, RequestNameReply};
use zbus::names::WellKnownName;
use zbus::{Connection, Error as ZbusError};

use novade_notifyd_core::config::BusKind;
use novade_notifyd_domain::notifications::NotificationService;

use super::signals::spawn_signal_forwarder;
use crate::dbus_interfaces::NotificationsServer;

pub const NOTIFICATIONS_BUS_NAME: &str = "org.freedesktop.Notifications";
pub const NOTIFICATIONS_OBJECT_PATH: &str = "/org/freedesktop/Notifications";

#[derive(Debug, Error)]
pub enum DbusManagerError {
    #[error("D-Bus connection failed: {0}")]
    ConnectionFailed(#[from] ZbusError),
    #[error("Failed to request D-Bus service name '{name}': {source}")]
    NameRequestFailed { name: String, source: ZbusError },
    #[error("Failed to serve D-Bus object at path '{path}': {source}")]
    ServeAtFailed { path: String, source: ZbusError },
}

pub type Result<T> = std::result::Result<T, DbusManagerError>;

/// Whether the daemon owns the notifications name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// Another server owns the name. The host keeps running without notifications.
    Unavailable,
}

/// Owns the bus connection and the notifications object registered on it.
pub struct DbusServiceManager {
    connection: Connection,
    availability: Arc<watch::Sender<Option<Availability>>>,
    signal_forwarder: Option<JoinHandle<()>>,
    name_watcher: Option<JoinHandle<()>>,
}

impl DbusServiceManager {
    /// Connects to the session or system bus.
    pub async fn connect(bus: BusKind) -> Result<Self> {
        tracing::info!(?bus, "Connecting to D-Bus");
        let connection = match bus {
            BusKind::Session => Connection::session().await?,
            BusKind::System => Connection::system().await?,
        };
        tracing::info!(
            "Connected to D-Bus. Unique name: {}",
            connection
                .unique_name()
                .map_or_else(|| "<unknown>".to_string(), |n| n.to_string())
        );
        Ok(Self::with_connection(connection))
    }

    pub fn with_connection(connection: Connection) -> Self {
        let (availability, _) = watch::channel(None);
        Self {
            connection,
            availability: Arc::new(availability),
            signal_forwarder: None,
            name_watcher: None,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// `None` until [`DbusServiceManager::serve_notifications`] has run.
    pub fn availability(&self) -> Option<Availability> {
        *self.availability.borrow()
    }

    /// Observes availability changes, including losing the name later on.
    pub fn subscribe_availability(&self) -> watch::Receiver<Option<Availability>> {
        self.availability.subscribe()
    }

    /// Serves the notifications object and claims the well-known name.
    ///
    /// The name is requested without queueing, replacing a replaceable owner
    /// and allowing later replacement. If another server holds the name the
    /// object is withdrawn and [`Availability::Unavailable`] is returned.
    ///
    /// When a later server takes the name over, signal forwarding stops and
    /// availability switches to [`Availability::Unavailable`].
    pub async fn serve_notifications(&mut self, service: Arc<dyn NotificationService>) -> Result<Availability> {
        let events = service.subscribe_to_notification_events();
        let dbus = DBusProxy::new(&self.connection).await?;
        let name_lost = dbus.receive_name_lost().await?;

        self.connection
            .object_server()
            .at(NOTIFICATIONS_OBJECT_PATH, NotificationsServer::new(service))
            .await
            .map_err(|e| DbusManagerError::ServeAtFailed {
                path: NOTIFICATIONS_OBJECT_PATH.to_string(),
                source: e,
            })?;

        let availability = self.request_name(NOTIFICATIONS_BUS_NAME).await?;
        self.availability.send_replace(Some(availability));
        match availability {
            Availability::Available => {
                let forwarder = spawn_signal_forwarder(self.connection.clone(), events);
                let lost_names = name_lost.filter_map(|signal| async move {
                    signal.args().ok().map(|args| args.name().to_string())
                });
                let state = self.availability.clone();
                let forwarder_abort = forwarder.abort_handle();
                self.name_watcher = Some(tokio::spawn(async move {
                    let _dbus = dbus;
                    watch_name_loss(lost_names, &state, forwarder_abort).await;
                }));
                self.signal_forwarder = Some(forwarder);
                tracing::info!("Serving {} at {}", NOTIFICATIONS_BUS_NAME, NOTIFICATIONS_OBJECT_PATH);
            }
            Availability::Unavailable => {
                if let Err(e) = self
                    .connection
                    .object_server()
                    .remove::<NotificationsServer, _>(NOTIFICATIONS_OBJECT_PATH)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to withdraw notifications object");
                }
                tracing::warn!("{} is owned by another server", NOTIFICATIONS_BUS_NAME);
            }
        }
        Ok(availability)
    }

    async fn request_name(&self, name: &str) -> Result<Availability> {
        let well_known_name = WellKnownName::try_from(name).map_err(|e| DbusManagerError::NameRequestFailed {
            name: name.to_string(),
            source: ZbusError::from(e),
        })?;

        tracing::info!("Requesting D-Bus name: {}", name);
        let flags = RequestNameFlags::DoNotQueue | RequestNameFlags::ReplaceExisting | RequestNameFlags::AllowReplacement;
        match self.connection.request_name_with_flags(well_known_name, flags).await {
            Ok(RequestNameReply::PrimaryOwner) | Ok(RequestNameReply::AlreadyOwner) => Ok(Availability::Available),
            Ok(reply) => {
                tracing::debug!(?reply, "Name request not granted");
                Ok(Availability::Unavailable)
            }
            Err(ZbusError::NameTaken) => Ok(Availability::Unavailable),
            Err(e) => Err(DbusManagerError::NameRequestFailed {
                name: name.to_string(),
                source: e,
            }),
        }
    }
}

/// Waits for the notifications name to be lost, then stops `forwarder` and
/// marks the daemon unavailable. Other lost names are ignored.
async fn watch_name_loss<S>(lost_names: S, availability: &watch::Sender<Option<Availability>>, forwarder: AbortHandle)
where
    S: Stream<Item = String>,
{
    let mut lost_names = std::pin::pin!(lost_names);
    while let Some(name) = lost_names.next().await {
        if name == NOTIFICATIONS_BUS_NAME {
            forwarder.abort();
            availability.send_replace(Some(Availability::Unavailable));
            tracing::warn!("{} was taken over by another server", NOTIFICATIONS_BUS_NAME);
            return;
        }
        tracing::debug!(name = %name, "Ignoring loss of unrelated name");
    }
}

impl Drop for DbusServiceManager {
    fn drop(&mut self) {
        for task in [self.signal_forwarder.take(), self.name_watcher.take()].into_iter().flatten() {
            task.abort();
        }
    }
}
