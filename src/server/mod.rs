//! HTTP front end: axum router over a [`SessionRegistry`].

pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::SessionRegistry;
use crate::config::ServerConfig;

/// Shared state for every route.
pub struct AppState {
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(sessions: SessionRegistry) -> Arc<Self> {
        Arc::new(Self { sessions })
    }
}

/// Build the router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/tools", get(handlers::list_tools))
        .route("/agents/create", post(handlers::create_agent))
        .route("/agents/chat", post(handlers::chat))
        .route("/agents/stream", post(handlers::stream))
        .route("/agents/:session_id", delete(handlers::delete_agent))
        .route(
            "/agents/:session_id/history",
            get(handlers::get_history).delete(handlers::clear_history),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve until Ctrl-C, then cancel every session and drain connections.
pub async fn serve(config: &ServerConfig, sessions: SessionRegistry) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        address = %listener.local_addr()?,
        environment = %config.environment,
        "Voice agent server listening"
    );

    let app = router(AppState::new(sessions.clone()));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sessions))
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(sessions: SessionRegistry) {
    wait_for_shutdown(tokio::signal::ctrl_c(), sessions).await;
}

/// Resolve once `signal` fires. A signal that cannot be installed never
/// resolves, so the server keeps running instead of stopping at startup.
async fn wait_for_shutdown<F>(signal: F, sessions: SessionRegistry)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested, closing agent sessions");
    // Cancelling sessions ends open streams so the server can drain.
    sessions.shutdown().await;
}
