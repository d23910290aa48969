//! Terminal Client Binary
//!
//! Interactive order-entry client for the Quotek trading venue.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p terminal-client -- <configuration-file>
//! ```
//!
//! The configuration file names the venue endpoint, the login credentials,
//! and the tradable instrument table (see [`terminal_client::config`]).
//!
//! # Exit Codes
//!
//! - `0`: normal `exit` or end of input
//! - `1`: configuration, connection, or login failure
//! - `2`: missing configuration-file argument
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter (default: `terminal_client=info`); diagnostics
//!   go to stderr, command output to stdout

use std::process::ExitCode;

use anyhow::Context as _;

use terminal_client::client::TerminalClient;
use terminal_client::config::load_settings;
use terminal_client::instruments::Instruments;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(config_path), None) = (args.next(), args.next()) else {
        eprintln!("Usage: terminal-client <configuration-file>");
        return ExitCode::from(2);
    };

    match run(&config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(config_path: &str) -> anyhow::Result<()> {
    let settings = load_settings(config_path)?;
    let instruments = Instruments::from_config(&settings.instruments)?;

    tracing::info!(
        endpoint = %settings.venue.endpoint(),
        instruments = instruments.len(),
        "Configuration loaded"
    );

    let mut client = TerminalClient::open(&settings.venue, instruments)
        .await
        .context("failed to open venue session")?;

    client.run().await.context("interactive loop failed")?;
    Ok(())
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses a static directive string that is a compile-time constant
/// guaranteed to parse. Logs go to stderr so listings on stdout stay clean.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "terminal_client=info"
                    .parse()
                    .expect("static directive 'terminal_client=info' is valid"),
            ),
        )
        .with_writer(std::io::stderr)
        .init();
}
