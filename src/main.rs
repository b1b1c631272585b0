//! portfwd: local port forwarder
//!
//! Entry point for the portfwd binary. Parses the command line, initializes
//! logging, builds the configuration and runs the forwarder until the process
//! is killed.
//!
//! Any startup failure is reported as a single log line on stderr followed by
//! exit status 1.

use anyhow::{Context, Result};
use clap::Parser;
use portfwd::{cli::Cli, config::Config, forward::Forwarder};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    // Parse CLI arguments first (before any other initialization)
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    info!("Start Local Port Forwarding");

    let forwarder = Forwarder::new(Config::from_cli(cli)?);
    info!(
        "listen: '{}', target: '{}'",
        forwarder.config().listen(),
        forwarder.config().target()
    );

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(forwarder.run())?;

    info!("End Local Port Forwarding");
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr.
///
/// # Verbosity Levels
/// - 0 (default): `RUST_LOG` if set, otherwise info
/// - 1 (-v): Debug level
/// - 2+ (-vv): Trace level
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
