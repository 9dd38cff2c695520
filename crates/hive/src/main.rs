mod app;
mod cache;
mod config;
mod handlers;
mod services;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::Config,
    state::AppState,
    storage::opensensemap::{OpenSenseMapClient, SenseBoxRepository},
};

/// Hive - Average temperature of a hive's surroundings from openSenseMap
#[derive(Parser, Debug)]
#[command(name = "hive")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hive=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        sense_boxes = config.sense_box_ids.len(),
        refresh_after_seconds = config.cache_refresh_after_seconds,
        "Loaded configuration"
    );

    let client =
        OpenSenseMapClient::new(&config.opensensemap_base_url, config.upstream_timeout())?;
    tracing::info!(upstream = %client.base_url(), "Using openSenseMap upstream");
    let upstream = Arc::new(SenseBoxRepository::new(
        client,
        config.sense_box_ids.clone(),
    ));

    let reachable = upstream.probe_all().await;
    tracing::info!(
        reachable,
        configured = config.sense_box_ids.len(),
        "Probed sense boxes"
    );

    let state = build_state(upstream, &config).await?;

    // Build the application router
    let app = create_app(state);

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Build application state with the in-memory cache backend.
#[cfg(feature = "memory")]
async fn build_state(upstream: Arc<SenseBoxRepository>, config: &Config) -> Result<AppState> {
    let cache = Arc::new(cache::MemoryCache::new(config.cache_max_entries)?);
    tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");

    Ok(AppState::build(upstream, cache, config))
}

/// Build application state with the Redis cache backend.
#[cfg(feature = "redis")]
async fn build_state(upstream: Arc<SenseBoxRepository>, config: &Config) -> Result<AppState> {
    let cache = Arc::new(cache::RedisCache::new(&config.redis_url).await?);
    tracing::info!(url = %config.redis_url, "Connected to Redis cache");

    Ok(AppState::build(upstream, cache, config))
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
