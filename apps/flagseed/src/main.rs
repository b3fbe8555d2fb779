//! Flagseed - seeds the default feature flags into the flag store.

use clap::Parser;
use flagseed::cli::{Cli, cmd_seed};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Log to stderr so `--json` output on stdout stays parseable.
/// `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cmd_seed(&cli.seed_config(), cli.json).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Feature flag initialization failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
