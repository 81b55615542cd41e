//! Connection events and their wire payload.

use serde::Serialize;
use std::time::Duration;

use super::dimensions::TelemetryDimensions;

/// Kind of connection event, carrying its measured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEventType {
    /// A connection attempt finished (successfully or not).
    VpnConnection { time_to_connection: Duration },
    /// A session ended.
    VpnDisconnection { session_length: Duration },
}

impl ConnectionEventType {
    /// Event name used on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            ConnectionEventType::VpnConnection { .. } => "vpn_connection",
            ConnectionEventType::VpnDisconnection { .. } => "vpn_disconnection",
        }
    }

    /// Measured values in milliseconds.
    pub fn values(&self) -> EventValues {
        match self {
            ConnectionEventType::VpnConnection { time_to_connection } => EventValues {
                time_to_connection: Some(millis(*time_to_connection)),
                session_length: None,
            },
            ConnectionEventType::VpnDisconnection { session_length } => EventValues {
                time_to_connection: None,
                session_length: Some(millis(*session_length)),
            },
        }
    }
}

/// Event handed to the telemetry transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub event: ConnectionEventType,
    pub dimensions: TelemetryDimensions,
}

impl ConnectionEvent {
    pub fn new(event: ConnectionEventType, dimensions: TelemetryDimensions) -> Self {
        Self { event, dimensions }
    }

    /// Build the payload posted to the stats endpoint.
    pub fn to_payload<'a>(&'a self, measurement_group: &'a str) -> TelemetryEventPayload<'a> {
        TelemetryEventPayload {
            measurement_group,
            event: self.event.event_name(),
            values: self.event.values(),
            dimensions: &self.dimensions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_connection: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_length: Option<u64>,
}

/// JSON body of a stats request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TelemetryEventPayload<'a> {
    pub measurement_group: &'a str,
    pub event: &'static str,
    pub values: EventValues,
    pub dimensions: &'a TelemetryDimensions,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
