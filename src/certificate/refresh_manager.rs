//! Certificate refresh scheduling.
//!
//! The manager keeps at most one pending wake-up. When it fires (or when no
//! usable certificate exists) the refresh API is called. Failures are retried
//! with an unbounded doubling backoff. Successes do not reschedule anything
//! directly: the storage's "stored" notification plans the next refresh from
//! the freshly stored certificate.
//!
//! All inputs (plan requests, timer fires, storage notifications) arrive as
//! [`RefreshMessage`]s on one channel and are handled strictly in order.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::backoff::RetryBackoff;
use super::model::VpnCertificate;
use crate::traits::{
    CertificateRefresher, CertificateStorage, CertificateStorageDelegate, Clock, ScheduledTask,
    TaskScheduler,
};

/// Input to the refresh manager.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshMessage {
    /// Re-read the stored certificate and plan the next refresh.
    PlanNextRefresh,
    /// A scheduled wake-up fired.
    TimerFired { generation: u64 },
    /// Storage notified a newly stored certificate.
    CertificateStored(VpnCertificate),
    /// Storage notified that the certificate was deleted.
    CertificateDeleted,
}

/// Cloneable sender side of a [`CertificateRefreshManager`].
///
/// Registered with the storage as its delegate at construction.
#[derive(Debug, Clone)]
pub struct RefreshManagerHandle {
    tx: mpsc::UnboundedSender<RefreshMessage>,
}

impl RefreshManagerHandle {
    /// Ask the manager to plan the next refresh.
    pub fn plan_next_refresh(&self) {
        self.send(RefreshMessage::PlanNextRefresh);
    }

    fn send(&self, message: RefreshMessage) {
        if self.tx.send(message).is_err() {
            tracing::debug!("Certificate refresh manager stopped, dropping message");
        }
    }
}

impl CertificateStorageDelegate for RefreshManagerHandle {
    fn certificate_stored(&self, certificate: VpnCertificate) {
        self.send(RefreshMessage::CertificateStored(certificate));
    }

    fn certificate_deleted(&self) {
        self.send(RefreshMessage::CertificateDeleted);
    }
}

struct PendingTimer {
    generation: u64,
    deadline: DateTime<Utc>,
    task: Box<dyn ScheduledTask>,
}

/// Owns the certificate renewal cadence.
pub struct CertificateRefreshManager {
    storage: Arc<dyn CertificateStorage>,
    refresher: Arc<dyn CertificateRefresher>,
    scheduler: Arc<dyn TaskScheduler>,
    clock: Arc<dyn Clock>,
    backoff: RetryBackoff,
    pending: Option<PendingTimer>,
    generation: u64,
    weak_tx: mpsc::WeakUnboundedSender<RefreshMessage>,
    rx: mpsc::UnboundedReceiver<RefreshMessage>,
}

impl CertificateRefreshManager {
    /// Create a manager and register its handle as the storage delegate.
    pub fn new(
        storage: Arc<dyn CertificateStorage>,
        refresher: Arc<dyn CertificateRefresher>,
        scheduler: Arc<dyn TaskScheduler>,
        clock: Arc<dyn Clock>,
    ) -> (Self, RefreshManagerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = RefreshManagerHandle { tx };
        storage.set_delegate(Arc::new(handle.clone()));

        let manager = Self {
            storage,
            refresher,
            scheduler,
            clock,
            backoff: RetryBackoff::default(),
            pending: None,
            generation: 0,
            weak_tx: handle.tx.downgrade(),
            rx,
        };
        (manager, handle)
    }

    /// Use a different retry floor (default 10 seconds).
    pub fn with_retry_floor(mut self, floor: Duration) -> Self {
        self.backoff = RetryBackoff::new(floor);
        self
    }

    /// Deadline of the pending wake-up, if one is armed.
    pub fn pending_refresh_at(&self) -> Option<DateTime<Utc>> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Last retry interval handed out by the backoff.
    pub fn current_backoff(&self) -> Duration {
        self.backoff.last_interval()
    }

    /// Plan the next refresh from the stored certificate.
    ///
    /// Refreshes right away when there is no certificate or its refresh time
    /// has passed, otherwise arms a wake-up at the refresh time.
    pub async fn plan_next_refresh(&mut self) {
        let certificate = match self.storage.stored_certificate() {
            Some(certificate) => certificate,
            None => {
                tracing::info!(
                    "No current certificate, will try to generate new certificate right now"
                );
                self.cancel_timer();
                self.refresh_certificate().await;
                return;
            }
        };

        if certificate.needs_refresh(self.clock.now()) {
            tracing::info!(
                "Current certificate should've been refreshed at {}. Starting refresh right now",
                certificate.refresh_time
            );
            self.cancel_timer();
            self.refresh_certificate().await;
            return;
        }

        self.start_timer(certificate.refresh_time);
    }

    /// Handle a single message.
    pub async fn handle(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::PlanNextRefresh => self.plan_next_refresh().await,
            RefreshMessage::TimerFired { generation } => {
                let current = self.pending.as_ref().map(|p| p.generation);
                if current != Some(generation) {
                    tracing::debug!(generation, "Ignoring stale certificate refresh timer");
                    return;
                }
                self.pending = None;
                self.refresh_certificate().await;
            }
            RefreshMessage::CertificateStored(certificate) => {
                tracing::debug!(
                    refresh_time = %certificate.refresh_time,
                    "Certificate stored, planning next refresh"
                );
                self.plan_next_refresh().await;
            }
            RefreshMessage::CertificateDeleted => {
                tracing::info!("Certificate deleted, stopping refresh schedule");
                self.cancel_timer();
            }
        }
    }

    /// Handle every message already queued without waiting for more.
    ///
    /// Returns how many messages were handled.
    pub async fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message).await;
            handled += 1;
        }
        handled
    }

    /// Consume messages until every handle is dropped.
    pub async fn run(mut self) {
        tracing::info!("Certificate refresh manager started");
        while let Some(message) = self.rx.recv().await {
            self.handle(message).await;
        }
        self.cancel_timer();
        tracing::debug!("Certificate refresh manager stopped");
    }

    /// Spawn [`run`](Self::run) on the tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn refresh_certificate(&mut self) {
        match self.refresher.refresh_certificate().await {
            Ok(certificate) => {
                self.backoff.reset();
                // Next refresh is planned when the storage reports the new certificate.
                tracing::info!(
                    refresh_time = %certificate.refresh_time,
                    "Certificate refreshed"
                );
            }
            Err(err) => {
                let delay = self.backoff.next_delay();
                tracing::error!(
                    "Failed to refresh certificate through API: {}. Will retry in {} seconds",
                    err,
                    delay.as_secs()
                );
                let retry_at = add_delay(self.clock.now(), delay);
                self.start_timer(retry_at);
            }
        }
    }

    fn start_timer(&mut self, deadline: DateTime<Utc>) {
        self.cancel_timer();

        self.generation += 1;
        let generation = self.generation;
        let weak_tx = self.weak_tx.clone();
        let task = self.scheduler.schedule_at(
            deadline,
            Box::new(move || {
                if let Some(tx) = weak_tx.upgrade() {
                    let _ = tx.send(RefreshMessage::TimerFired { generation });
                }
            }),
        );

        self.pending = Some(PendingTimer {
            generation,
            deadline,
            task,
        });
        tracing::info!("Certificate refresh timer set up for {}", deadline);
    }

    fn cancel_timer(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            pending.task.cancel();
            tracing::info!("Certificate refresh timer invalidated");
        }
    }
}

fn add_delay(now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(delay)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
