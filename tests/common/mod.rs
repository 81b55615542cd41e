//! Common test utilities for integration tests.
//!
//! Fixtures for certificates, connections and a fully mocked telemetry
//! service.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use vpn_session_core::adapters::mock::{
    ManualClock, RecordingTransport, StaticAccountProvider, StaticConnectionProvider,
    StaticFeatureFlags, StaticSessionProperties,
};
use vpn_session_core::certificate::VpnCertificate;
use vpn_session_core::connection::{ActiveConnection, ServerFeature, ServerInfo, VpnProtocol};
use vpn_session_core::telemetry::{AccountInfo, TelemetryDependencies, TelemetryService};

/// Fixed start instant for clock-driven tests.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Certificate whose refresh is due at `at`.
pub fn certificate_refreshing_at(at: DateTime<Utc>) -> VpnCertificate {
    VpnCertificate {
        certificate: format!("cert-{}", at.timestamp()),
        valid_until: at + chrono::Duration::hours(1),
        refresh_time: at,
    }
}

/// Paid WireGuard connection to a Swiss server.
pub fn test_connection() -> ActiveConnection {
    ActiveConnection {
        server: ServerInfo {
            name: "CH#12".to_string(),
            country_code: "CH".to_string(),
            features: vec![ServerFeature::SecureCore],
            is_free: false,
        },
        ports: vec![51820, 443],
        vpn_protocol: VpnProtocol::WireGuardUdp,
    }
}

/// Telemetry service wired to mocks, with handles to steer them.
pub struct TelemetryHarness {
    pub clock: ManualClock,
    pub connections: StaticConnectionProvider,
    pub flags: StaticFeatureFlags,
    pub transport: RecordingTransport,
    pub service: TelemetryService,
}

pub struct TelemetryHarnessBuilder {
    account: Option<AccountInfo>,
    session: StaticSessionProperties,
    opted_in: bool,
    connection: Option<ActiveConnection>,
}

impl TelemetryHarnessBuilder {
    pub fn new() -> Self {
        Self {
            account: None,
            session: StaticSessionProperties::new(),
            opted_in: true,
            connection: Some(test_connection()),
        }
    }

    pub fn with_account(mut self, account: AccountInfo) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_session(mut self, session: StaticSessionProperties) -> Self {
        self.session = session;
        self
    }

    pub fn opted_in(mut self, opted_in: bool) -> Self {
        self.opted_in = opted_in;
        self
    }

    pub fn without_connection(mut self) -> Self {
        self.connection = None;
        self
    }

    pub fn build(self) -> TelemetryHarness {
        let clock = ManualClock::new(start_time());
        let connections = StaticConnectionProvider::new(self.connection);
        let flags = StaticFeatureFlags::new(self.opted_in);
        let transport = RecordingTransport::new();
        let service = TelemetryService::new(TelemetryDependencies {
            clock: Arc::new(clock.clone()),
            active_connection: Arc::new(connections.clone()),
            account: Arc::new(StaticAccountProvider::new(self.account)),
            session: Arc::new(self.session),
            feature_flags: Arc::new(flags.clone()),
            transport: Arc::new(transport.clone()),
        });

        TelemetryHarness {
            clock,
            connections,
            flags,
            transport,
            service,
        }
    }
}
