//! HTTP server for civicad.

use crate::mailer::Mailer;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Fixed local listen address
pub const LISTEN_ADDR: &str = "127.0.0.1:8631";

/// Application state shared across handlers
pub struct AppState {
    pub mailer: Arc<Mailer>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(mailer: Mailer) -> Self {
        Self {
            mailer: Arc::new(mailer),
            start_time: Instant::now(),
        }
    }
}

/// Assemble the full router. Split out from `run` so tests can drive
/// it without a socket.
pub fn app(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(routes::portal_routes())
        .merge(routes::asset_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let app = app(state);

    // Bind to localhost only
    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR).await?;
    info!("Listening on http://{}", LISTEN_ADDR);

    axum::serve(listener, app).await?;
    Ok(())
}
