//! `door` and `rain` command implementations.

use std::sync::Arc;

use anyhow::{Context, Result};
use contracts::Notifier;
use document_store::{MongoStore, MongoStoreConfig};
use ingestion::sensors::{door, rain};
use ingestion::{AlertStrategy, IngestionService, SensorProfile};
use notifier::{LogNotifier, WebhookConfig, WebhookNotifier};
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::signal::shutdown_signal;
use crate::cli::{optional_millis, RainArgs, ServiceArgs};

/// Execute the `door` command
pub async fn run_door(args: &ServiceArgs) -> Result<()> {
    let profile = apply_threshold(door::profile(), args);
    let store = connect_store(args, &profile).await?;

    let service = door::service(profile, store.clone());
    serve(service, args, door::DEFAULT_PORT).await?;

    store.shutdown().await;
    Ok(())
}

/// Execute the `rain` command
pub async fn run_rain(args: &RainArgs) -> Result<()> {
    let profile = apply_threshold(rain::profile(), &args.service);
    let store = connect_store(&args.service, &profile).await?;

    match &args.alert_webhook_url {
        Some(url) => {
            let notifier = WebhookNotifier::new(
                "webhook",
                WebhookConfig {
                    url: url.clone(),
                    timeout: optional_millis(args.notify_timeout_ms),
                },
            )
            .context("Failed to build webhook notifier")?;
            run_rain_with(profile, store.clone(), notifier, &args.service).await?;
        }
        None => {
            warn!("ALERT_WEBHOOK_URL not set, rain alerts will only be logged");
            run_rain_with(profile, store.clone(), LogNotifier::new("log"), &args.service).await?;
        }
    }

    store.shutdown().await;
    Ok(())
}

async fn run_rain_with<N>(
    profile: SensorProfile,
    store: MongoStore,
    notifier: N,
    args: &ServiceArgs,
) -> Result<()>
where
    N: Notifier + Send + Sync + 'static,
{
    info!(notifier = notifier.name(), "Rain alerts enabled");
    serve(rain::service(profile, store, notifier), args, rain::DEFAULT_PORT).await
}

fn apply_threshold(profile: SensorProfile, args: &ServiceArgs) -> SensorProfile {
    match args.threshold {
        Some(limit) => {
            info!(sensor = %profile.name, threshold = limit, "Overriding threshold");
            let threshold = profile.threshold.with_limit(limit);
            profile.with_threshold(threshold)
        }
        None => profile,
    }
}

async fn connect_store(args: &ServiceArgs, profile: &SensorProfile) -> Result<MongoStore> {
    let config = MongoStoreConfig::new(&args.mongo_hostname, &profile.name);
    MongoStore::connect(&config)
        .await
        .with_context(|| format!("Failed to connect to MongoDB at {}", config.uri()))
}

async fn serve<A>(
    service: IngestionService<MongoStore, A>,
    args: &ServiceArgs,
    default_port: u16,
) -> Result<()>
where
    A: AlertStrategy + Send + Sync + 'static,
{
    let port = args.port.unwrap_or(default_port);
    let listener = TcpListener::bind((args.bind.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", args.bind, port))?;

    info!(
        sensor = %service.profile().name,
        threshold = ?service.profile().threshold,
        port,
        "Ingestion service starting"
    );

    ingestion::http::serve(listener, Arc::new(service), shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Ingestion service finished");
    Ok(())
}
