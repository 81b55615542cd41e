//! VPN certificate lifecycle: model, retry backoff and refresh scheduling.

mod backoff;
mod model;
mod refresh_manager;

pub use backoff::{RetryBackoff, DEFAULT_RETRY_FLOOR};
pub use model::VpnCertificate;
pub use refresh_manager::{CertificateRefreshManager, RefreshManagerHandle, RefreshMessage};
