//! # Sensor Relay CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - The MQTT to HTTP bridge
//! - The door and rain ingestion services
//! - Routing file validation

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_bridge, run_door, run_rain, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(observability_config(&cli))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Sensor Relay starting"
    );

    let result = match &cli.command {
        Commands::Bridge(args) => run_bridge(args).await,
        Commands::Door(args) => run_door(args).await,
        Commands::Rain(args) => run_rain(args).await,
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// `RUST_LOG` wins unless `--quiet` is given
fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let default_log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.metrics_port > 0).then_some(cli.metrics_port),
        default_log_level: default_log_level.to_string(),
        force_level: cli.quiet,
    }
}
