//! # HTTP Server for the Print Relay
//!
//! Public HTTP surface consumed by the web front end. Two routes are wired
//! to the same handler because the two historical deployments of this
//! service exposed the endpoint at different paths; both are one contract.
//!
//! ## Usage
//!
//! ```bash
//! dada-relay --listen 0.0.0.0:3001
//! ```

mod handlers;
mod state;

pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::post,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::DadaError;

/// Build the application router.
///
/// Exposed separately from [`serve`] so tests can drive the router
/// in-process without binding a socket.
pub fn router(state: Arc<AppState>) -> Result<Router, DadaError> {
    let cors = cors_layer(&state.config)?;

    let app = Router::new()
        .route("/", post(handlers::print::generate_and_print))
        .route(
            "/generate-and-print",
            post(handlers::print::generate_and_print),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// CORS restricted to the single configured front-end origin.
///
/// The layer also answers `OPTIONS` preflights, so no explicit preflight
/// route is needed.
fn cors_layer(config: &Config) -> Result<CorsLayer, DadaError> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|_| {
            DadaError::Config(format!(
                "ALLOWED_ORIGIN is not a valid origin: {:?}",
                config.allowed_origin
            ))
        })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> Result<(), DadaError> {
    let listen_addr = config.listen_addr.clone();
    let relay_url = config.relay_url.clone();
    let app_state = Arc::new(AppState::new(config)?);
    let app = router(app_state)?;

    tracing::info!("Dada relay server starting");
    tracing::info!("Listening on {listen_addr}");
    tracing::info!("Relaying print jobs to {relay_url}");

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| DadaError::Config(format!("Failed to bind to {listen_addr}: {e}")))?;

    // Connect-info so handlers can fall back to the peer address when no
    // x-forwarded-for header is present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
