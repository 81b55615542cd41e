//! Typed input streams consumed by the telemetry service.
//!
//! All three streams share one ordered channel so that a user intent posted
//! before a status change is always seen before it.

use tokio::sync::mpsc;

use super::dimensions::NetworkType;
use crate::connection::{ActiveConnection, ConnectionStatus, UserInitiatedChange};

/// Connectivity change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionNotification {
    /// `None` when the payload carried no recognizable status.
    pub status: Option<ConnectionStatus>,
    /// Context of the active connection, when the source knows it.
    pub connection: Option<ActiveConnection>,
}

impl ConnectionNotification {
    pub fn new(status: ConnectionStatus) -> Self {
        Self {
            status: Some(status),
            connection: None,
        }
    }

    /// Build from a raw status string. Unknown strings yield a notification
    /// without status, which the service ignores.
    pub fn from_raw(raw: &str) -> Self {
        Self {
            status: raw.parse().ok(),
            connection: None,
        }
    }

    pub fn with_connection(mut self, connection: ActiveConnection) -> Self {
        self.connection = Some(connection);
        self
    }
}

/// Message consumed by [`TelemetryService`](super::TelemetryService).
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryInput {
    ConnectionChanged(ConnectionNotification),
    ReachabilityChanged(NetworkType),
    UserInitiatedChange(UserInitiatedChange),
}

/// Sender side with one method per input stream.
#[derive(Debug, Clone)]
pub struct TelemetryInputSender {
    tx: mpsc::UnboundedSender<TelemetryInput>,
}

impl TelemetryInputSender {
    pub fn connection_changed(&self, notification: ConnectionNotification) {
        self.send(TelemetryInput::ConnectionChanged(notification));
    }

    pub fn reachability_changed(&self, network_type: NetworkType) {
        self.send(TelemetryInput::ReachabilityChanged(network_type));
    }

    pub fn user_initiated_change(&self, change: UserInitiatedChange) {
        self.send(TelemetryInput::UserInitiatedChange(change));
    }

    fn send(&self, input: TelemetryInput) {
        if self.tx.send(input).is_err() {
            tracing::debug!("Telemetry service stopped, dropping input");
        }
    }
}

/// Create the ordered input channel for a telemetry service.
pub fn telemetry_channel() -> (TelemetryInputSender, mpsc::UnboundedReceiver<TelemetryInput>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TelemetryInputSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_keep_order_across_streams() {
        let (sender, mut rx) = telemetry_channel();
        sender.user_initiated_change(UserInitiatedChange::Disconnect);
        sender.connection_changed(ConnectionNotification::new(ConnectionStatus::Disconnected));
        sender.reachability_changed(NetworkType::Mobile);

        assert_eq!(
            rx.try_recv().unwrap(),
            TelemetryInput::UserInitiatedChange(UserInitiatedChange::Disconnect)
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            TelemetryInput::ConnectionChanged(ConnectionNotification {
                status: Some(ConnectionStatus::Disconnected),
                ..
            })
        ));
        assert_eq!(
            rx.try_recv().unwrap(),
            TelemetryInput::ReachabilityChanged(NetworkType::Mobile)
        );
    }

    #[test]
    fn test_unknown_raw_status() {
        assert_eq!(ConnectionNotification::from_raw("reasserting").status, None);
        assert_eq!(
            ConnectionNotification::from_raw("connected").status,
            Some(ConnectionStatus::Connected)
        );
    }

    #[test]
    fn test_send_after_receiver_dropped_does_not_panic() {
        let (sender, rx) = telemetry_channel();
        drop(rx);
        sender.reachability_changed(NetworkType::Wifi);
    }
}
