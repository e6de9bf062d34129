use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use footfall::analytics::AnalyticsEngine;
use footfall::api::create_api_router;
use footfall::config::{Config, DatabaseBackend};
use footfall::storage::{EventStore, PostgresEventStore, SqliteEventStore};
use footfall::tracking::{create_tracking_router, VisitRecorder};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let store: Arc<dyn EventStore> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite event store: {}", config.database.url);
            Arc::new(
                SqliteEventStore::new(&config.database.url, config.database.max_connections)
                    .await
                    .context("failed to open SQLite event store")?,
            )
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL event store");
            Arc::new(
                PostgresEventStore::new(&config.database.url, config.database.max_connections)
                    .await
                    .context("failed to connect to PostgreSQL event store")?,
            )
        }
    };

    info!("Initializing database...");
    store.init().await?;
    info!("Database initialized successfully");

    let recorder = Arc::new(VisitRecorder::new(Arc::clone(&store), &config.recorder));
    let engine = AnalyticsEngine::new(Arc::clone(&store));

    // Create routers
    let api_router = create_api_router(engine, &config.analytics, &config.cors);
    let tracking_router = create_tracking_router(Arc::clone(&recorder));

    // Start API server
    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API server to {api_addr}"))?;
    info!("🚀 API server listening on http://{}", api_addr);
    info!(
        "   - Visitor statistics at http://{}/api/analytics/visitors?days={}",
        api_addr, config.analytics.default_window_days
    );

    // Start tracking server
    let tracking_addr = format!(
        "{}:{}",
        config.tracking_server.host, config.tracking_server.port
    );
    let tracking_listener = tokio::net::TcpListener::bind(&tracking_addr)
        .await
        .with_context(|| format!("failed to bind tracking server to {tracking_addr}"))?;
    info!("🚀 Tracking server listening on http://{}", tracking_addr);

    // Run both servers until Ctrl-C
    let shutdown_rx = spawn_shutdown_listener(tokio::signal::ctrl_c());

    let served = tokio::try_join!(
        axum::serve(api_listener, api_router).with_graceful_shutdown(wait_for(shutdown_rx.clone())),
        axum::serve(tracking_listener, tracking_router)
            .with_graceful_shutdown(wait_for(shutdown_rx)),
    );

    match recorder.shutdown().await {
        Ok(()) => info!("Visit recorder flushed"),
        Err(e) => error!("Failed to flush pending visits on shutdown: {:#}", e),
    }

    served?;
    Ok(())
}

/// Flip the returned watch channel to `true` once `signal` resolves
///
/// If the signal cannot be registered the channel never fires, so the
/// servers keep running instead of stopping at startup.
fn spawn_shutdown_listener<F>(signal: F) -> watch::Receiver<bool>
where
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = signal.await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
    shutdown_rx
}

async fn wait_for(mut shutdown_rx: watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}
