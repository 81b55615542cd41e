//! Telemetry dimensions attached to every connection event.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::connection::{ServerFeature, VpnProtocol};
use crate::error::ParseError;

/// Business outcome of a connection attempt or session end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
    Free,
    Paid,
    Internal,
}

/// Whether the VPN was on before the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VpnStatus {
    On,
    Off,
}

/// Reachability classification of the underlying network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    #[default]
    Unavailable,
    Wifi,
    Mobile,
}

impl FromStr for NetworkType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wifi" => Ok(NetworkType::Wifi),
            "mobile" => Ok(NetworkType::Mobile),
            "unavailable" => Ok(NetworkType::Unavailable),
            _ => Err(ParseError::UnknownNetworkType(s.trim().to_string())),
        }
    }
}

/// What started the last connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VpnTrigger {
    Quick,
    Country,
    City,
    Server,
    Profile,
    Map,
    Tray,
    Auto,
    NewConnection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountPlan {
    Free,
    Trial,
    Basic,
    Plus,
    Unlimited,
    Visionary,
}

/// Cached account details relevant for telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub plan: AccountPlan,
    /// Highest server tier the account can use.
    pub max_tier: Option<u8>,
}

/// Tier value reserved for internal accounts.
const INTERNAL_MAX_TIER: u8 = 3;

impl UserTier {
    /// Derive the tier from cached account info; no info counts as free.
    pub fn from_account(account: Option<&AccountInfo>) -> Self {
        let Some(account) = account else {
            return UserTier::Free;
        };
        if account.max_tier == Some(INTERNAL_MAX_TIER) {
            return UserTier::Internal;
        }
        match account.plan {
            AccountPlan::Free | AccountPlan::Trial => UserTier::Free,
            _ => UserTier::Paid,
        }
    }
}

/// Real location of the user as seen by the geo lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserLocation {
    pub country: String,
    pub isp: String,
}

/// Immutable snapshot of the report context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryDimensions {
    pub outcome: Outcome,
    pub user_tier: UserTier,
    pub vpn_status: VpnStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpn_trigger: Option<VpnTrigger>,
    pub network_type: NetworkType,
    pub server_features: Vec<ServerFeature>,
    pub vpn_country: String,
    pub user_country: String,
    pub protocol: VpnProtocol,
    pub server: String,
    pub port: String,
    pub isp: String,
    pub is_server_free: bool,
}
