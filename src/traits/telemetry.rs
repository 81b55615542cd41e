//! Collaborators consulted when a telemetry report is assembled.

use chrono::{DateTime, Utc};

use crate::connection::ActiveConnection;
use crate::telemetry::{AccountInfo, ConnectionEvent, UserLocation, VpnTrigger};

/// Locally evaluated feature flags that gate telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryFeature {
    /// User agreed to send anonymous usage statistics.
    TelemetryOptIn,
}

/// Boolean feature flag lookup.
pub trait FeatureFlags: Send + Sync {
    fn is_enabled(&self, feature: TelemetryFeature) -> bool;
}

/// Delivers finished events. Fire-and-forget: implementations must not block.
pub trait TelemetryTransport: Send + Sync {
    fn flush_event(&self, event: ConnectionEvent);
}

/// Current VPN connection context (server, ports, protocol).
pub trait ActiveConnectionProvider: Send + Sync {
    fn active_connection(&self) -> Option<ActiveConnection>;
}

/// Cached account information used to derive the user tier.
pub trait AccountInfoProvider: Send + Sync {
    fn cached_account(&self) -> Option<AccountInfo>;
}

/// Persisted session properties.
pub trait SessionProperties: Send + Sync {
    /// Trigger of the most recent connection request.
    fn last_connection_trigger(&self) -> Option<VpnTrigger>;

    /// Geo lookup of the user's real location.
    fn user_location(&self) -> Option<UserLocation>;

    /// When the current session was established, if one survived a restart.
    fn last_connected_at(&self) -> Option<DateTime<Utc>>;
}
