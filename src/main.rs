use vpn_session_core::cli::{self, CliCommand, PayloadPrinter};
use vpn_session_core::config::CoreConfig;

use color_eyre::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // Logs go to stderr so stdout only carries event payloads
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let command = cli::parse_args(std::env::args());

    // Handle --version flag before any initialization
    if command == CliCommand::Version {
        cli::handle_version_command();
    }

    color_eyre::install()?;
    init_tracing();

    match command {
        CliCommand::Replay => {
            let config = CoreConfig::from_env()?;
            let runtime = tokio::runtime::Runtime::new()?;
            let printer = PayloadPrinter::new(config.telemetry.measurement_group);
            let deps = cli::replay_dependencies(Arc::new(printer));

            let forwarded = runtime.block_on(async {
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                cli::run_replay(stdin, deps).await
            })?;
            tracing::info!(forwarded, "Replay finished");
            Ok(())
        }
        CliCommand::Help | CliCommand::Version => {
            println!("{}", cli::USAGE);
            Ok(())
        }
    }
}
