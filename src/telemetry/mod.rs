//! Connection telemetry: dimensions, events, input streams and the
//! aggregating service.

mod dimensions;
mod event;
mod input;
mod service;

pub use dimensions::{
    AccountInfo, AccountPlan, NetworkType, Outcome, TelemetryDimensions, UserLocation, UserTier,
    VpnStatus, VpnTrigger,
};
pub use event::{ConnectionEvent, ConnectionEventType, EventValues, TelemetryEventPayload};
pub use input::{telemetry_channel, ConnectionNotification, TelemetryInput, TelemetryInputSender};
pub use service::{TelemetryDependencies, TelemetryService};
