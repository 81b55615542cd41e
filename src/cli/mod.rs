//! CLI module for vpn-session.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Replaying connection notifications through the telemetry pipeline

pub mod args;
pub mod replay;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use replay::{parse_line, replay_dependencies, run_replay, PayloadPrinter};
pub use version::{handle_version_command, VERSION};

/// Usage text printed for unknown or missing commands.
pub const USAGE: &str = "\
Usage: vpn-session <COMMAND>

Commands:
  replay     Read connection notifications from stdin and print telemetry events

Options:
  -V, --version  Print version";
