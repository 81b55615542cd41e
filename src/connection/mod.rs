//! VPN connection state: statuses, active connection context, timing and
//! the transition tracker that feeds telemetry.

mod active;
mod status;
mod timer;
mod tracker;

pub use active::{ActiveConnection, ServerFeature, ServerInfo, VpnProtocol};
pub use status::{ConnectionStatus, UserInitiatedChange};
pub use timer::ConnectionTimer;
pub use tracker::{connection_event_type, connection_outcome, ConnectionStateTracker, Transition};
