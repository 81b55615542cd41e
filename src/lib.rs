//! VPN session core - certificate renewal scheduling and connection telemetry
//!
//! This library exposes modules for use by the `vpn-session` binary and
//! integration tests.

pub mod adapters;
pub mod certificate;
pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod telemetry;
pub mod traits;
