//! Context of the active VPN connection.

use serde::{Deserialize, Serialize};

/// Tunnel protocol in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VpnProtocol {
    #[serde(rename = "wireguard_udp")]
    WireGuardUdp,
    #[serde(rename = "wireguard_tcp")]
    WireGuardTcp,
    #[serde(rename = "wireguard_tls")]
    WireGuardTls,
    #[serde(rename = "openvpn_udp")]
    OpenVpnUdp,
    #[serde(rename = "openvpn_tcp")]
    OpenVpnTcp,
    #[serde(rename = "ikev2")]
    Ike,
}

/// Optional server capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerFeature {
    SecureCore,
    Tor,
    P2p,
    Streaming,
    Ipv6,
}

/// Server the client is connected (or connecting) to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Logical server name, e.g. `CH#12`.
    pub name: String,
    /// Exit country code.
    pub country_code: String,
    pub features: Vec<ServerFeature>,
    /// Server is available on the free plan.
    pub is_free: bool,
}

/// Active connection context attached to telemetry reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveConnection {
    pub server: ServerInfo,
    /// Ports the tunnel may use; the first one is reported.
    pub ports: Vec<u16>,
    pub vpn_protocol: VpnProtocol,
}

impl ActiveConnection {
    /// Port reported in telemetry. `None` when no port is known.
    pub fn primary_port(&self) -> Option<u16> {
        self.ports.first().copied()
    }
}
