//! Telemetry aggregation.
//!
//! Turns connection transitions into [`ConnectionEvent`]s enriched with the
//! active connection, account, session and reachability context, and hands
//! them to the transport when telemetry is opted in.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::dimensions::{NetworkType, TelemetryDimensions, UserTier, VpnStatus};
use super::event::ConnectionEvent;
use super::input::{ConnectionNotification, TelemetryInput};
use crate::connection::{
    ActiveConnection, ConnectionStateTracker, ConnectionStatus, ConnectionTimer, Transition,
    UserInitiatedChange,
};
use crate::traits::{
    AccountInfoProvider, ActiveConnectionProvider, Clock, FeatureFlags, SessionProperties,
    TelemetryFeature, TelemetryTransport,
};

/// Collaborators of a [`TelemetryService`].
#[derive(Clone)]
pub struct TelemetryDependencies {
    pub clock: Arc<dyn Clock>,
    pub active_connection: Arc<dyn ActiveConnectionProvider>,
    pub account: Arc<dyn AccountInfoProvider>,
    pub session: Arc<dyn SessionProperties>,
    pub feature_flags: Arc<dyn FeatureFlags>,
    pub transport: Arc<dyn TelemetryTransport>,
}

/// Derives connection telemetry from status, reachability and intent inputs.
pub struct TelemetryService {
    tracker: ConnectionStateTracker,
    network_type: NetworkType,
    deps: TelemetryDependencies,
}

impl TelemetryService {
    pub fn new(deps: TelemetryDependencies) -> Self {
        let mut timer = ConnectionTimer::new(deps.clock.clone());
        if let Some(connected_at) = deps.session.last_connected_at() {
            timer.update_connection_started(connected_at);
        }

        Self {
            tracker: ConnectionStateTracker::new(timer),
            network_type: NetworkType::Unavailable,
            deps,
        }
    }

    pub fn tracker(&self) -> &ConnectionStateTracker {
        &self.tracker
    }

    /// Handle one input.
    pub fn handle(&mut self, input: TelemetryInput) {
        match input {
            TelemetryInput::ConnectionChanged(notification) => {
                self.connection_changed(notification)
            }
            TelemetryInput::ReachabilityChanged(network_type) => {
                self.reachability_changed(network_type)
            }
            TelemetryInput::UserInitiatedChange(change) => self.user_initiated_change(change),
        }
    }

    pub fn reachability_changed(&mut self, network_type: NetworkType) {
        tracing::debug!(?network_type, "Reachability changed");
        self.network_type = network_type;
    }

    pub fn user_initiated_change(&mut self, change: UserInitiatedChange) {
        tracing::debug!(?change, "User initiated VPN change");
        self.tracker.record_user_intent(change);
    }

    pub fn connection_changed(&mut self, notification: ConnectionNotification) {
        let Some(status) = notification.status else {
            tracing::trace!("Ignoring connection notification without a recognizable status");
            return;
        };

        let Some(transition) = self.tracker.handle_status(status) else {
            return;
        };

        if let Some(event) = self.build_event(&transition, notification.connection) {
            self.report(event);
        }
    }

    /// Consume inputs until every sender is dropped.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<TelemetryInput>) {
        tracing::info!("Telemetry service started");
        while let Some(input) = rx.recv().await {
            self.handle(input);
        }
        tracing::debug!("Telemetry service stopped");
    }

    /// Spawn [`run`](Self::run) on the tokio runtime.
    pub fn spawn(self, rx: mpsc::UnboundedReceiver<TelemetryInput>) -> JoinHandle<()> {
        tokio::spawn(self.run(rx))
    }

    fn build_event(
        &self,
        transition: &Transition,
        connection: Option<ActiveConnection>,
    ) -> Option<ConnectionEvent> {
        let event_type = transition.event_type?;

        let Some(connection) =
            connection.or_else(|| self.deps.active_connection.active_connection())
        else {
            tracing::debug!(
                status = %transition.status,
                "No active connection, skipping telemetry report"
            );
            return None;
        };
        let Some(port) = connection.primary_port() else {
            tracing::debug!(
                server = %connection.server.name,
                "Active connection has no port, skipping telemetry report"
            );
            return None;
        };

        let location = self.deps.session.user_location().unwrap_or_default();
        let account = self.deps.account.cached_account();
        let vpn_status = if transition.previous == Some(ConnectionStatus::Connected) {
            VpnStatus::On
        } else {
            VpnStatus::Off
        };

        let dimensions = TelemetryDimensions {
            outcome: transition.outcome,
            user_tier: UserTier::from_account(account.as_ref()),
            vpn_status,
            vpn_trigger: self.deps.session.last_connection_trigger(),
            network_type: self.network_type,
            server_features: connection.server.features.clone(),
            vpn_country: connection.server.country_code.clone(),
            user_country: location.country,
            protocol: connection.vpn_protocol,
            server: connection.server.name.clone(),
            port: port.to_string(),
            isp: location.isp,
            is_server_free: connection.server.is_free,
        };

        Some(ConnectionEvent::new(event_type, dimensions))
    }

    fn report(&self, event: ConnectionEvent) {
        if !self
            .deps
            .feature_flags
            .is_enabled(TelemetryFeature::TelemetryOptIn)
        {
            tracing::debug!("Telemetry opted out, dropping {}", event.event.event_name());
            return;
        }
        tracing::debug!(
            event = event.event.event_name(),
            outcome = ?event.dimensions.outcome,
            "Reporting connection event"
        );
        self.deps.transport.flush_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{
        ManualClock, RecordingTransport, StaticAccountProvider, StaticConnectionProvider,
        StaticFeatureFlags, StaticSessionProperties,
    };
    use crate::connection::{ServerFeature, ServerInfo, VpnProtocol};
    use crate::telemetry::{
        AccountInfo, AccountPlan, ConnectionEventType, Outcome, UserLocation, VpnTrigger,
    };
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    struct Fixture {
        clock: ManualClock,
        connections: StaticConnectionProvider,
        flags: StaticFeatureFlags,
        transport: RecordingTransport,
        service: TelemetryService,
    }

    fn connection() -> ActiveConnection {
        ActiveConnection {
            server: ServerInfo {
                name: "SE#7".to_string(),
                country_code: "SE".to_string(),
                features: vec![ServerFeature::SecureCore],
                is_free: false,
            },
            ports: vec![443, 1194],
            vpn_protocol: VpnProtocol::OpenVpnTcp,
        }
    }

    fn fixture_with_session(session: StaticSessionProperties) -> Fixture {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let connections = StaticConnectionProvider::new(Some(connection()));
        let flags = StaticFeatureFlags::new(true);
        let transport = RecordingTransport::new();
        let service = TelemetryService::new(TelemetryDependencies {
            clock: Arc::new(clock.clone()),
            active_connection: Arc::new(connections.clone()),
            account: Arc::new(StaticAccountProvider::new(Some(AccountInfo {
                plan: AccountPlan::Plus,
                max_tier: Some(2),
            }))),
            session: Arc::new(session),
            feature_flags: Arc::new(flags.clone()),
            transport: Arc::new(transport.clone()),
        });
        Fixture {
            clock,
            connections,
            flags,
            transport,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_session(
            StaticSessionProperties::new()
                .with_trigger(VpnTrigger::Country)
                .with_location(UserLocation {
                    country: "FR".to_string(),
                    isp: "Orange".to_string(),
                }),
        )
    }

    fn status(service: &mut TelemetryService, status: ConnectionStatus) {
        service.connection_changed(ConnectionNotification::new(status));
    }

    #[test]
    fn test_connection_event_dimensions() {
        let mut f = fixture();
        f.service.reachability_changed(NetworkType::Wifi);
        status(&mut f.service, ConnectionStatus::Connecting);
        f.clock.advance(chrono::Duration::seconds(2));
        status(&mut f.service, ConnectionStatus::Connected);

        let events = f.transport.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(
            event.event,
            ConnectionEventType::VpnConnection {
                time_to_connection: Duration::from_secs(2)
            }
        );
        let d = &event.dimensions;
        assert_eq!(d.outcome, Outcome::Success);
        assert_eq!(d.user_tier, UserTier::Paid);
        assert_eq!(d.vpn_status, VpnStatus::Off);
        assert_eq!(d.vpn_trigger, Some(VpnTrigger::Country));
        assert_eq!(d.network_type, NetworkType::Wifi);
        assert_eq!(d.server_features, vec![ServerFeature::SecureCore]);
        assert_eq!(d.vpn_country, "SE");
        assert_eq!(d.user_country, "FR");
        assert_eq!(d.protocol, VpnProtocol::OpenVpnTcp);
        assert_eq!(d.server, "SE#7");
        assert_eq!(d.port, "443");
        assert_eq!(d.isp, "Orange");
        assert!(!d.is_server_free);
    }

    #[test]
    fn test_vpn_status_on_when_previous_connected() {
        let mut f = fixture();
        status(&mut f.service, ConnectionStatus::Connecting);
        status(&mut f.service, ConnectionStatus::Connected);
        f.service.user_initiated_change(UserInitiatedChange::Disconnect);
        status(&mut f.service, ConnectionStatus::Disconnected);

        let events = f.transport.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].dimensions.vpn_status, VpnStatus::On);
        assert_eq!(events[1].dimensions.outcome, Outcome::Success);
    }

    #[test]
    fn test_notification_context_takes_precedence() {
        let mut f = fixture();
        let mut other = connection();
        other.server.name = "US-NY#1".to_string();
        other.ports = vec![51820];

        status(&mut f.service, ConnectionStatus::Connecting);
        f.service.connection_changed(
            ConnectionNotification::new(ConnectionStatus::Connected).with_connection(other),
        );

        let events = f.transport.events();
        assert_eq!(events[0].dimensions.server, "US-NY#1");
        assert_eq!(events[0].dimensions.port, "51820");
    }

    #[test]
    fn test_no_active_connection_drops_report() {
        let mut f = fixture();
        f.connections.set(None);
        status(&mut f.service, ConnectionStatus::Connecting);
        status(&mut f.service, ConnectionStatus::Connected);
        assert!(f.transport.events().is_empty());
    }

    #[test]
    fn test_connection_without_port_drops_report() {
        let mut f = fixture();
        let mut portless = connection();
        portless.ports.clear();
        f.connections.set(Some(portless));
        status(&mut f.service, ConnectionStatus::Connecting);
        status(&mut f.service, ConnectionStatus::Connected);
        assert!(f.transport.events().is_empty());
    }

    #[test]
    fn test_opt_out_drops_report_but_state_advances() {
        let mut f = fixture();
        f.flags.set(false);
        status(&mut f.service, ConnectionStatus::Connecting);
        status(&mut f.service, ConnectionStatus::Connected);

        assert!(f.transport.events().is_empty());
        assert_eq!(
            f.service.tracker().previous_status(),
            Some(ConnectionStatus::Connected)
        );
    }

    #[test]
    fn test_unrecognized_notification_is_ignored() {
        let mut f = fixture();
        status(&mut f.service, ConnectionStatus::Connected);
        f.service
            .connection_changed(ConnectionNotification::from_raw("reasserting"));
        assert_eq!(
            f.service.tracker().previous_status(),
            Some(ConnectionStatus::Connected)
        );
        assert!(f.transport.events().is_empty());
    }

    #[test]
    fn test_restored_session_reports_length_on_disconnect() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut f = fixture_with_session(
            StaticSessionProperties::new()
                .with_last_connected_at(start - chrono::Duration::minutes(5)),
        );
        status(&mut f.service, ConnectionStatus::Connected);
        f.clock.advance(chrono::Duration::minutes(1));
        status(&mut f.service, ConnectionStatus::Disconnected);

        let events = f.transport.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].event,
            ConnectionEventType::VpnDisconnection {
                session_length: Duration::from_secs(360)
            }
        );
        assert_eq!(events[0].dimensions.outcome, Outcome::Failure);
    }
}
