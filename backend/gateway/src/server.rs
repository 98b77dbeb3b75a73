//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::routes;
use crate::services::Services;
use crate::sessions::SessionRegistry;

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub registry: SessionRegistry,
    pub services: Arc<Services>,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            registry: SessionRegistry::new(),
            services: Arc::new(services),
        }
    }
}

/// Build the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/sessions", post(routes::create_session))
        .route("/api/sessions/:id", get(routes::get_session))
        .route("/api/sessions/:id/image", post(routes::upload_image))
        .route("/api/sessions/:id/analyze", post(routes::analyze))
        .route("/api/sessions/:id/drafts", post(routes::generate_drafts))
        .route(
            "/api/sessions/:id/export/:channel",
            post(routes::export_channel),
        )
        .route("/api/sessions/:id/csv", post(routes::upload_csv))
        .route("/api/sessions/:id/ask", post(routes::ask))
        .route("/api/sessions/:id/promo", post(routes::promo))
        .with_state(state)
}

/// Start the Axum HTTP server for the gateway.
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = router(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
