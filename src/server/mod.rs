//! HTTP endpoint exposing the extraction pipeline.

pub mod routes;

use crate::config::Config;
use crate::scrape::{Extractor, HttpFetcher};
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Extractor,
    /// Include error chains in 500 responses
    pub dev_mode: bool,
}

/// Builds the router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/scrape", post(routes::scrape_handler))
        .route("/api/sites", get(routes::sites_handler))
        .route("/health", get(routes::health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `host:port` and serves until the process exits.
pub async fn serve(config: &Config) -> Result<()> {
    let fetcher = HttpFetcher::new(config).context("Failed to create HTTP client")?;
    let state = AppState {
        extractor: Extractor::new(Arc::new(fetcher)).with_policy(config.inclusion),
        dev_mode: config.dev_mode,
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on {}", addr);
    if config.dev_mode {
        info!("Development mode: error chains are included in 500 responses");
    }

    axum::serve(listener, router(state)).await.context("Server error")?;

    Ok(())
}
