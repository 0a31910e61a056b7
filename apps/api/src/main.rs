mod api_client;
mod config;
mod dashboard;
mod errors;
mod models;
mod reconcile;
mod routes;
mod search;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::ApiClient;
use crate::config::{CacheBackend, Config};
use crate::reconcile::Reconciler;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, MemoryStore, RedisStore, SnapshotStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Tracker API v{}", env!("CARGO_PKG_VERSION"));

    // Upstream REST backend
    let api = ApiClient::new(
        &config.upstream_api_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to build upstream client")?;
    info!("Upstream API at {}", api.base_url());

    // Snapshot store for the offline fallback
    let store = build_store(&config).await?;
    info!("Snapshot store: {}", store.backend());

    let state = AppState {
        reconciler: Reconciler::new(Arc::new(api), store),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the frontend origin once it has a fixed deployment URL

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn SnapshotStore>> {
    let store: Arc<dyn SnapshotStore> = match config.cache_backend {
        CacheBackend::Memory => Arc::new(MemoryStore::new()),
        CacheBackend::File => Arc::new(
            FileStore::open(&config.cache_dir)
                .await
                .with_context(|| format!("Failed to open {}", config.cache_dir.display()))?,
        ),
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required when CACHE_BACKEND=redis")?;
            Arc::new(
                RedisStore::connect(url, config.cache_ttl_secs)
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
    };
    Ok(store)
}
