//! Ticket Sync Engine - Host process for the offline operation queue
//!
//! The process:
//! - Restores queued operations from the key-value store
//! - Serves the HTTP bridge used by the platform shell
//! - Applies reachability transitions and replays the queue on reconnect

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticket_sync_engine::infrastructure::config::AppConfig;
use ticket_sync_engine::infrastructure::http;
use ticket_sync_engine::infrastructure::reachability::{
    reachability_channel, reachability_prober, reachability_worker,
};
use ticket_sync_engine::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticket_sync_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Ticket Sync Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Queue backend: {}", config.queue.backend);
    tracing::info!("  Scan API: {}", config.scan_api.base_url);

    let (reporter, events) = reachability_channel();

    // Initialize application state
    let state = Arc::new(AppState::new(config, reporter.clone()).await?);
    tracing::info!(
        "Application state initialized with {} queued operation(s)",
        state.queue.len().await
    );

    let reachability_worker_task = tokio::spawn(reachability_worker(state.queue.clone(), events));

    let prober_task = state.config.reachability.probe_url.clone().map(|probe_url| {
        let interval = state.config.reachability.probe_interval;
        tokio::spawn(reachability_prober(
            reqwest::Client::new(),
            probe_url,
            interval,
            reporter,
        ))
    });

    // Operations left over from the previous session
    let startup_replay = {
        let queue = state.queue.clone();
        tokio::spawn(async move {
            let outcome = queue.replay_coalesced().await;
            tracing::info!("Startup replay: {:?}", outcome);
        })
    };

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping workers...");
            reachability_worker_task.abort();
            if let Some(task) = prober_task {
                task.abort();
            }
            startup_replay.abort();
            if let Err(e) = state.queue.flush().await {
                tracing::error!("Final queue flush failed: {}", e);
            }
            tracing::info!("Workers stopped");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
