//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/view` -- `WebSocket` view-change stream
/// - `GET /api/view` -- full view snapshot
/// - `GET /api/geofences` -- fence catalog with activity flags
/// - `GET /api/markers` -- one marker per tracked entity
/// - `GET /api/markers/:id` -- single entity marker
/// - `GET /api/history` -- membership events, newest first
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/view", get(ws::ws_view))
        // REST API
        .route("/api/view", get(handlers::get_view))
        .route("/api/geofences", get(handlers::list_geofences))
        .route("/api/markers", get(handlers::list_markers))
        .route("/api/markers/{id}", get(handlers::get_marker))
        .route("/api/history", get(handlers::list_history))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
