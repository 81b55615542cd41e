//! Command-line argument parsing for the vpn-session CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Replay connection notifications from stdin
    Replay,
    /// Print usage
    Help,
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use vpn_session_core::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["vpn-session".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    for arg in args.skip(1) {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "replay" => return CliCommand::Replay,
            _ => {}
        }
    }
    CliCommand::Help
}
