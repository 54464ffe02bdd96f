mod actions;
mod config;
mod document;
mod errors;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
mod tracker;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionClient, CompletionService, RetryingCompletion};
use crate::routes::build_router;
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume actions v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client
    let client = CompletionClient::from_config(&config)?;
    info!("Completion client initialized (model: {})", client.model());
    let completion: Arc<dyn CompletionService> = if config.completion_retry {
        info!("Completion retries enabled");
        Arc::new(RetryingCompletion::new(client))
    } else {
        Arc::new(client)
    };

    // Initialize session store
    let sessions = build_session_store(&config).await;
    info!("Session store: {}", sessions.backend());

    let state = AppState {
        completion,
        sessions,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when configured and reachable; otherwise sessions live in process memory.
async fn build_session_store(config: &Config) -> Arc<dyn SessionStore> {
    if let Some(url) = &config.redis_url {
        match RedisSessionStore::connect(url, config.session_ttl_secs).await {
            Ok(store) => return Arc::new(store),
            Err(e) => warn!("Redis unavailable ({e}), falling back to in-memory sessions"),
        }
    }
    Arc::new(MemorySessionStore::new(Duration::from_secs(
        config.session_ttl_secs,
    )))
}
