//! HTTP surface of the relay.
//!
//! `POST /webhook` accepts any JSON document and fans it out; `GET /health`
//! reports liveness for status clients. The server shuts down gracefully on
//! Ctrl+C or SIGTERM.

pub mod handlers;

use crate::config::settings::DEFAULT_MAX_BODY_BYTES;
use crate::core::Relay;
use crate::utils::error::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub started_at: DateTime<Utc>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
            started_at: Utc::now(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Builds the relay router. Bodies above `state.max_body_bytes` get `413`
/// before any destination is contacted.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::receive_webhook))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `host:port` and serves until a shutdown signal arrives.
///
/// # Errors
///
/// Returns `RelayError::IoError` when the address cannot be bound.
pub async fn start_server(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = create_router(state);

    info!("Starting HTTP server on {}:{}", host, port);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let actual_addr = listener.local_addr()?;

    info!("🚀 Relay listening on {}", actual_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting for in-flight fan-outs to complete");
}
