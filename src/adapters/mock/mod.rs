//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`ManualClock`] / [`ManualScheduler`] - Time that only moves when told to
//! - [`InMemoryCertificateStorage`] - Certificate storage with delegate notifications
//! - [`MockCertificateRefresher`] - Scripted refresh API
//! - [`RecordingTransport`] - Captures flushed telemetry events
//! - [`StaticFeatureFlags`], [`StaticConnectionProvider`], [`StaticAccountProvider`],
//!   [`StaticSessionProperties`] - Fixed collaborator values
//! - [`MockHttpClient`] - HTTP client with configurable responses

pub mod certificates;
pub mod clock;
pub mod http;
pub mod telemetry;

pub use certificates::{InMemoryCertificateStorage, MockCertificateRefresher};
pub use clock::{ManualClock, ManualScheduler};
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use telemetry::{
    RecordingTransport, StaticAccountProvider, StaticConnectionProvider, StaticFeatureFlags,
    StaticSessionProperties,
};
