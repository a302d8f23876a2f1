// notifyd-system/src/dbus_interfaces/notifications_server.rs
use std::collections::HashMap;
use std::sync::Arc;

use zbus::zvariant::OwnedValue;
use zbus::{dbus_interface, SignalContext};

use novade_notifyd_domain::notifications::{CloseReason, NotificationId, NotificationInput, NotificationService};

use super::hints::decode_hints;
use crate::error::to_fdo_error;

/// `org.freedesktop.Notifications` object.
///
/// The `handle_*` methods hold the call logic and are usable without a bus;
/// the interface methods only unpack arguments and delegate.
pub struct NotificationsServer {
    notification_service: Arc<dyn NotificationService>,
}

impl NotificationsServer {
    pub fn new(notification_service: Arc<dyn NotificationService>) -> Self {
        Self { notification_service }
    }

    pub async fn handle_notify(&self, input: NotificationInput) -> zbus::fdo::Result<NotificationId> {
        tracing::debug!(
            app_name = %input.app_name,
            replaces_id = input.replaces_id,
            expire_timeout = input.expire_timeout,
            "D-Bus Notify called"
        );
        self.notification_service.create_notification(input).await.map_err(|e| {
            tracing::warn!(error = %e, "Notify rejected");
            to_fdo_error(e)
        })
    }

    /// Closing an unknown or already closed id is not an error.
    pub async fn handle_close_notification(&self, id: NotificationId) -> zbus::fdo::Result<()> {
        tracing::debug!(id, "D-Bus CloseNotification called");
        self.notification_service
            .close_notification(id, CloseReason::ClosedByRequest)
            .await;
        Ok(())
    }

    pub fn handle_get_capabilities(&self) -> Vec<String> {
        self.notification_service.capabilities()
    }

    pub fn handle_get_server_information(&self) -> (String, String, String, String) {
        let info = self.notification_service.server_information();
        (info.name, info.vendor, info.version, info.spec_version)
    }
}

#[dbus_interface(name = "org.freedesktop.Notifications")]
impl NotificationsServer {
    async fn get_capabilities(&self) -> Vec<String> {
        self.handle_get_capabilities()
    }

    #[allow(clippy::too_many_arguments)]
    async fn notify(
        &self,
        app_name: String,
        replaces_id: u32,
        app_icon: String,
        summary: String,
        body: String,
        actions: Vec<String>,
        hints: HashMap<String, OwnedValue>,
        expire_timeout: i32,
    ) -> zbus::fdo::Result<u32> {
        let input = NotificationInput {
            app_name,
            replaces_id,
            app_icon,
            summary,
            body,
            actions,
            hints: decode_hints(&hints),
            expire_timeout,
        };
        self.handle_notify(input).await
    }

    async fn close_notification(&self, id: u32) -> zbus::fdo::Result<()> {
        self.handle_close_notification(id).await
    }

    #[dbus_interface(out_args("name", "vendor", "version", "spec_version"))]
    async fn get_server_information(&self) -> (String, String, String, String) {
        self.handle_get_server_information()
    }

    // --- Signals ---

    #[dbus_interface(signal)]
    pub async fn notification_closed(context: &SignalContext<'_>, id: u32, reason: u32) -> zbus::Result<()>;

    #[dbus_interface(signal)]
    pub async fn action_invoked(context: &SignalContext<'_>, id: u32, action_key: &str) -> zbus::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::{mock, predicate::eq};
    use novade_notifyd_domain::notifications::{
        Notification, NotificationError, NotificationEvent, NotificationView, ServerInformation, Urgency,
    };
    use pretty_assertions::assert_eq;
    use tokio::sync::broadcast;

    mock! {
        pub Service {}

        #[async_trait]
        impl NotificationService for Service {
            async fn create_notification(&self, input: NotificationInput) -> Result<NotificationId, NotificationError>;
            async fn close_notification(&self, id: NotificationId, reason: CloseReason) -> bool;
            async fn invoke_action(&self, id: NotificationId, action_key: &str) -> Result<bool, NotificationError>;
            async fn get_notification(&self, id: NotificationId) -> Option<Arc<Notification>>;
            fn capabilities(&self) -> Vec<String>;
            fn server_information(&self) -> ServerInformation;
            fn sorted_view(&self) -> NotificationView;
            fn subscribe_to_notification_events(&self) -> broadcast::Receiver<NotificationEvent>;
        }
    }

    fn server(mock: MockService) -> NotificationsServer {
        NotificationsServer::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn notify_forwards_decoded_input() {
        let mut mock = MockService::new();
        mock.expect_create_notification()
            .withf(|input| {
                input.app_name == "Mail"
                    && input.replaces_id == 3
                    && input.hints.urgency == Urgency::Critical
                    && input.actions == vec!["default".to_string(), "Open".to_string()]
                    && input.expire_timeout == 5000
            })
            .times(1)
            .returning(|_| Ok(4));

        let mut input = NotificationInput {
            app_name: "Mail".to_string(),
            replaces_id: 3,
            actions: vec!["default".to_string(), "Open".to_string()],
            expire_timeout: 5000,
            ..NotificationInput::default()
        };
        input.hints.urgency = Urgency::Critical;

        assert_eq!(server(mock).handle_notify(input).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn notify_maps_invalid_actions_to_invalid_args() {
        let mut mock = MockService::new();
        mock.expect_create_notification()
            .returning(|input| Err(NotificationError::InvalidActionList { len: input.actions.len() }));

        let input = NotificationInput {
            actions: vec!["orphan".to_string()],
            ..NotificationInput::default()
        };
        let err = server(mock).handle_notify(input).await.unwrap_err();
        assert!(matches!(err, zbus::fdo::Error::InvalidArgs(_)));
    }

    #[tokio::test]
    async fn close_uses_closed_by_request_and_ignores_unknown_ids() {
        let mut mock = MockService::new();
        mock.expect_close_notification()
            .with(eq(999), eq(CloseReason::ClosedByRequest))
            .times(1)
            .returning(|_, _| false);

        assert!(server(mock).handle_close_notification(999).await.is_ok());
    }

    #[test]
    fn server_information_is_flattened() {
        let mut mock = MockService::new();
        mock.expect_server_information().returning(ServerInformation::current);
        mock.expect_capabilities()
            .returning(|| vec!["actions".to_string(), "body".to_string()]);

        let server = server(mock);
        let (name, vendor, _version, spec_version) = server.handle_get_server_information();
        assert_eq!((name.as_str(), vendor.as_str(), spec_version.as_str()), ("novade-notifyd", "NovaDE", "1.2"));
        assert_eq!(server.handle_get_capabilities(), vec!["actions".to_string(), "body".to_string()]);
    }
}
