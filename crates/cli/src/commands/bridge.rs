//! `bridge` command implementation.

use anyhow::{Context, Result};
use bridge::{BridgeOptions, BridgeRouter};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::signal::shutdown_signal;
use crate::cli::{optional_millis, BridgeArgs};

/// Execute the `bridge` command
pub async fn run_bridge(args: &BridgeArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading routing configuration");

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    for warning in config_loader::collect_warnings(&config) {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    info!(
        broker_host = %config.broker.host,
        broker_port = config.broker.port,
        routes = config.targets.len(),
        "Configuration loaded"
    );

    let options = BridgeOptions {
        forward_timeout: optional_millis(args.forward_timeout_ms),
        ..Default::default()
    };
    let router = BridgeRouter::connect(&config, options)
        .await
        .context("Failed to start bridge")?;

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    router.run(shutdown).await.context("Bridge stopped")?;

    info!("Bridge finished");
    Ok(())
}
