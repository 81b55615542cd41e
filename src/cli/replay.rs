//! Replay of connection notifications read line by line.
//!
//! Each line is one of:
//!
//! - a status: `connecting`, `connected`, `disconnecting`, `disconnected`
//! - a user intent: `intent:connect`, `intent:disconnect`, `intent:abort`
//! - a reachability change: `network:wifi`, `network:mobile`, `network:unavailable`
//!
//! Blank lines and lines starting with `#` are skipped.

use color_eyre::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::adapters::mock::{
    StaticAccountProvider, StaticConnectionProvider, StaticFeatureFlags, StaticSessionProperties,
};
use crate::adapters::SystemClock;
use crate::connection::{
    ActiveConnection, ConnectionStatus, ServerFeature, ServerInfo, UserInitiatedChange,
    VpnProtocol,
};
use crate::error::ParseError;
use crate::telemetry::{
    telemetry_channel, ConnectionEvent, ConnectionNotification, NetworkType, TelemetryDependencies,
    TelemetryInput, TelemetryInputSender, TelemetryService,
};
use crate::traits::TelemetryTransport;

/// Parse one replay line.
///
/// Returns `Ok(None)` for lines that carry nothing.
pub fn parse_line(line: &str) -> Result<Option<TelemetryInput>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    if let Some(change) = line.strip_prefix("intent:") {
        let change = change.parse::<UserInitiatedChange>()?;
        return Ok(Some(TelemetryInput::UserInitiatedChange(change)));
    }

    if let Some(network) = line.strip_prefix("network:") {
        let network_type = network.parse::<NetworkType>()?;
        return Ok(Some(TelemetryInput::ReachabilityChanged(network_type)));
    }

    let status = line.parse::<ConnectionStatus>()?;
    Ok(Some(TelemetryInput::ConnectionChanged(
        ConnectionNotification::new(status),
    )))
}

/// Prints every event payload as one JSON line on stdout.
#[derive(Debug, Clone)]
pub struct PayloadPrinter {
    measurement_group: String,
}

impl PayloadPrinter {
    pub fn new(measurement_group: impl Into<String>) -> Self {
        Self {
            measurement_group: measurement_group.into(),
        }
    }
}

impl TelemetryTransport for PayloadPrinter {
    fn flush_event(&self, event: ConnectionEvent) {
        let payload = event.to_payload(&self.measurement_group);
        match serde_json::to_string(&payload) {
            Ok(json) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", json) {
                    tracing::warn!("Failed to write event payload: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize event payload: {}", e),
        }
    }
}

/// Connection context reported by the replay.
pub fn replay_connection() -> ActiveConnection {
    ActiveConnection {
        server: ServerInfo {
            name: "CH#1".to_string(),
            country_code: "CH".to_string(),
            features: vec![ServerFeature::P2p],
            is_free: false,
        },
        ports: vec![51820],
        vpn_protocol: VpnProtocol::WireGuardUdp,
    }
}

/// Collaborators for a replay that reports everything to `transport`.
pub fn replay_dependencies(transport: Arc<dyn TelemetryTransport>) -> TelemetryDependencies {
    TelemetryDependencies {
        clock: Arc::new(SystemClock),
        active_connection: Arc::new(StaticConnectionProvider::new(Some(replay_connection()))),
        account: Arc::new(StaticAccountProvider::new(None)),
        session: Arc::new(StaticSessionProperties::new()),
        feature_flags: Arc::new(StaticFeatureFlags::new(true)),
        transport,
    }
}

/// Feed every line of `input` to a telemetry service built from `deps`.
///
/// Returns the number of inputs forwarded once the service has drained them.
pub async fn run_replay<R>(input: R, deps: TelemetryDependencies) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let (sender, rx) = telemetry_channel();
    let service = TelemetryService::new(deps).spawn(rx);

    let forwarded = forward_lines(input, &sender).await;
    drop(sender);
    service.await?;

    Ok(forwarded?)
}

async fn forward_lines<R>(input: R, sender: &TelemetryInputSender) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut forwarded = 0;
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(input)) => {
                match input {
                    TelemetryInput::ConnectionChanged(notification) => {
                        sender.connection_changed(notification)
                    }
                    TelemetryInput::ReachabilityChanged(network_type) => {
                        sender.reachability_changed(network_type)
                    }
                    TelemetryInput::UserInitiatedChange(change) => {
                        sender.user_initiated_change(change)
                    }
                }
                forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(line = %line, "Ignoring replay line: {}", e),
        }
    }
    Ok(forwarded)
}
