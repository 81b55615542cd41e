//! Connection status and user intent annotations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Raw VPN connectivity status as reported by the tunnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnecting,
    Disconnected,
}

impl ConnectionStatus {
    /// Whether this status is remembered as the previous status.
    ///
    /// `Disconnecting` is transient and never remembered.
    pub fn is_remembered(self) -> bool {
        !matches!(self, ConnectionStatus::Disconnecting)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnecting => "disconnecting",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connecting" => Ok(ConnectionStatus::Connecting),
            "connected" => Ok(ConnectionStatus::Connected),
            "disconnecting" => Ok(ConnectionStatus::Disconnecting),
            "disconnected" => Ok(ConnectionStatus::Disconnected),
            _ => Err(ParseError::UnknownStatus(s.trim().to_string())),
        }
    }
}

/// Marks the next status transition as caused by an explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserInitiatedChange {
    Connect,
    Disconnect,
    Abort,
}

impl FromStr for UserInitiatedChange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connect" => Ok(UserInitiatedChange::Connect),
            "disconnect" => Ok(UserInitiatedChange::Disconnect),
            "abort" => Ok(UserInitiatedChange::Abort),
            _ => Err(ParseError::UnknownChange(s.trim().to_string())),
        }
    }
}
