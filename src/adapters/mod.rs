//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`SystemClock`] - Wall clock
//! - [`TokioScheduler`] - Single-shot wake-ups on the tokio runtime
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`HttpTelemetryTransport`] - Posts connection events to the stats endpoint
//!
//! The [`mock`] submodule provides test doubles for every trait.

pub mod http_telemetry;
pub mod mock;
pub mod reqwest_http;
pub mod system_clock;
pub mod tokio_scheduler;

pub use http_telemetry::HttpTelemetryTransport;
pub use reqwest_http::ReqwestHttpClient;
pub use system_clock::SystemClock;
pub use tokio_scheduler::{TokioScheduler, TokioTask};
