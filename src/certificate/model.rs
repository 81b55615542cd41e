//! VPN authentication certificate as seen by the scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored VPN certificate.
///
/// `certificate` is opaque to this crate. Only `refresh_time` drives
/// scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpnCertificate {
    /// PEM-encoded certificate material.
    pub certificate: String,
    /// Instant after which the certificate is no longer accepted.
    pub valid_until: DateTime<Utc>,
    /// Instant after which the certificate is considered stale.
    pub refresh_time: DateTime<Utc>,
}

impl VpnCertificate {
    /// Check if the refresh time has been reached at `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.refresh_time <= now
    }

    /// Check if the certificate has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until <= now
    }
}
