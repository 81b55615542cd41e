//! Certificate storage and refresh API abstractions.
//!
//! The storage owns the certificate. Everything in this crate only reads it
//! and reacts to the storage's change notifications.

use async_trait::async_trait;
use std::sync::Arc;

use crate::certificate::VpnCertificate;
use crate::error::RefreshError;

/// Receives storage change notifications.
pub trait CertificateStorageDelegate: Send + Sync {
    /// A new certificate was written to storage.
    fn certificate_stored(&self, certificate: VpnCertificate);

    /// The stored certificate was removed.
    fn certificate_deleted(&self);
}

/// Read access to the stored VPN certificate.
pub trait CertificateStorage: Send + Sync {
    /// Currently stored certificate, if any.
    fn stored_certificate(&self) -> Option<VpnCertificate>;

    /// Register the delegate that receives store/delete notifications.
    ///
    /// Replaces any previously registered delegate.
    fn set_delegate(&self, delegate: Arc<dyn CertificateStorageDelegate>);
}

/// Requests a fresh certificate from the API.
///
/// A successful call is expected to end up in [`CertificateStorage`], which
/// then notifies its delegate. The returned certificate is informational.
#[async_trait]
pub trait CertificateRefresher: Send + Sync {
    /// Fetch and store a new certificate.
    async fn refresh_certificate(&self) -> Result<VpnCertificate, RefreshError>;
}
