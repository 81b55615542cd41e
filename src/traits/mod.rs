//! Trait abstractions for the collaborators around the core.
//!
//! Every external dependency (time, storage, APIs, transports, state
//! providers) is injected through one of these traits so the core can be
//! driven by mocks in tests.
//!
//! # Traits
//!
//! - [`Clock`] / [`TaskScheduler`] - Wall clock and single-shot wake-ups
//! - [`CertificateStorage`] / [`CertificateStorageDelegate`] - Stored certificate and
//!   its notifications
//! - [`CertificateRefresher`] - Certificate refresh API
//! - [`TelemetryTransport`] - Event delivery
//! - [`FeatureFlags`] - Telemetry opt-in lookup
//! - [`HttpClient`] - HTTP POST used by the telemetry transport

pub mod certificates;
pub mod clock;
pub mod http;
pub mod telemetry;

pub use certificates::{CertificateRefresher, CertificateStorage, CertificateStorageDelegate};
pub use clock::{Clock, FireCallback, ScheduledTask, TaskScheduler};
pub use http::{Headers, HttpClient, HttpError, Response};
pub use telemetry::{
    AccountInfoProvider, ActiveConnectionProvider, FeatureFlags, SessionProperties,
    TelemetryFeature, TelemetryTransport,
};
