//! In-memory certificate storage and scripted refresh API.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::certificate::VpnCertificate;
use crate::error::RefreshError;
use crate::traits::{CertificateRefresher, CertificateStorage, CertificateStorageDelegate};

/// In-memory certificate storage that notifies its delegate.
#[derive(Clone, Default)]
pub struct InMemoryCertificateStorage {
    certificate: Arc<Mutex<Option<VpnCertificate>>>,
    delegate: Arc<Mutex<Option<Arc<dyn CertificateStorageDelegate>>>>,
}

impl InMemoryCertificateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_certificate(certificate: VpnCertificate) -> Self {
        let storage = Self::new();
        storage.set_silently(Some(certificate));
        storage
    }

    /// Store a certificate and notify the delegate.
    pub fn store(&self, certificate: VpnCertificate) {
        *self.certificate.lock().unwrap() = Some(certificate.clone());
        if let Some(delegate) = self.delegate() {
            delegate.certificate_stored(certificate);
        }
    }

    /// Remove the certificate and notify the delegate.
    pub fn delete(&self) {
        *self.certificate.lock().unwrap() = None;
        if let Some(delegate) = self.delegate() {
            delegate.certificate_deleted();
        }
    }

    /// Replace the certificate without notifying anyone.
    pub fn set_silently(&self, certificate: Option<VpnCertificate>) {
        *self.certificate.lock().unwrap() = certificate;
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.lock().unwrap().is_some()
    }

    fn delegate(&self) -> Option<Arc<dyn CertificateStorageDelegate>> {
        self.delegate.lock().unwrap().clone()
    }
}

impl CertificateStorage for InMemoryCertificateStorage {
    fn stored_certificate(&self) -> Option<VpnCertificate> {
        self.certificate.lock().unwrap().clone()
    }

    fn set_delegate(&self, delegate: Arc<dyn CertificateStorageDelegate>) {
        *self.delegate.lock().unwrap() = Some(delegate);
    }
}

/// Refresh API returning scripted results in order.
///
/// Successful results are written to the attached storage, like the real
/// API client does. An exhausted script fails with a network error.
#[derive(Clone, Default)]
pub struct MockCertificateRefresher {
    results: Arc<Mutex<VecDeque<Result<VpnCertificate, RefreshError>>>>,
    storage: Option<InMemoryCertificateStorage>,
    calls: Arc<AtomicUsize>,
}

impl MockCertificateRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write successful refreshes into `storage`.
    pub fn storing_into(storage: InMemoryCertificateStorage) -> Self {
        Self {
            storage: Some(storage),
            ..Self::default()
        }
    }

    pub fn push_success(&self, certificate: VpnCertificate) {
        self.results.lock().unwrap().push_back(Ok(certificate));
    }

    pub fn push_failure(&self, error: RefreshError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    /// Number of refresh calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CertificateRefresher for MockCertificateRefresher {
    async fn refresh_certificate(&self) -> Result<VpnCertificate, RefreshError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.results.lock().unwrap().pop_front();
        let certificate = next.unwrap_or_else(|| {
            Err(RefreshError::Network("no scripted response".to_string()))
        })?;

        if let Some(storage) = &self.storage {
            storage.store(certificate.clone());
        }
        Ok(certificate)
    }
}
