//! Static telemetry collaborators and a recording transport.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::connection::ActiveConnection;
use crate::telemetry::{AccountInfo, ConnectionEvent, UserLocation, VpnTrigger};
use crate::traits::{
    AccountInfoProvider, ActiveConnectionProvider, FeatureFlags, SessionProperties,
    TelemetryFeature, TelemetryTransport,
};

/// Transport that keeps every flushed event.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    events: Arc<Mutex<Vec<ConnectionEvent>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConnectionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetryTransport for RecordingTransport {
    fn flush_event(&self, event: ConnectionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Telemetry opt-in flag that can be flipped at runtime.
#[derive(Debug, Clone)]
pub struct StaticFeatureFlags {
    telemetry_opt_in: Arc<AtomicBool>,
}

impl StaticFeatureFlags {
    pub fn new(telemetry_opt_in: bool) -> Self {
        Self {
            telemetry_opt_in: Arc::new(AtomicBool::new(telemetry_opt_in)),
        }
    }

    pub fn set(&self, telemetry_opt_in: bool) {
        self.telemetry_opt_in.store(telemetry_opt_in, Ordering::SeqCst);
    }
}

impl FeatureFlags for StaticFeatureFlags {
    fn is_enabled(&self, feature: TelemetryFeature) -> bool {
        match feature {
            TelemetryFeature::TelemetryOptIn => self.telemetry_opt_in.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticConnectionProvider {
    connection: Arc<Mutex<Option<ActiveConnection>>>,
}

impl StaticConnectionProvider {
    pub fn new(connection: Option<ActiveConnection>) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }

    pub fn set(&self, connection: Option<ActiveConnection>) {
        *self.connection.lock().unwrap() = connection;
    }
}

impl ActiveConnectionProvider for StaticConnectionProvider {
    fn active_connection(&self) -> Option<ActiveConnection> {
        self.connection.lock().unwrap().clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticAccountProvider {
    account: Option<AccountInfo>,
}

impl StaticAccountProvider {
    pub fn new(account: Option<AccountInfo>) -> Self {
        Self { account }
    }
}

impl AccountInfoProvider for StaticAccountProvider {
    fn cached_account(&self) -> Option<AccountInfo> {
        self.account.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticSessionProperties {
    trigger: Option<VpnTrigger>,
    location: Option<UserLocation>,
    last_connected_at: Option<DateTime<Utc>>,
}

impl StaticSessionProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trigger(mut self, trigger: VpnTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_location(mut self, location: UserLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_last_connected_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_connected_at = Some(at);
        self
    }
}

impl SessionProperties for StaticSessionProperties {
    fn last_connection_trigger(&self) -> Option<VpnTrigger> {
        self.trigger
    }

    fn user_location(&self) -> Option<UserLocation> {
        self.location.clone()
    }

    fn last_connected_at(&self) -> Option<DateTime<Utc>> {
        self.last_connected_at
    }
}
