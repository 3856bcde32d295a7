//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read from the committed in-memory [`ViewSnapshot`] via
//! the shared [`AppState`]. The rendering layer (map dashboard) is the
//! intended consumer; nothing here mutates engine state.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/geofences` | Fence catalog with activity flags |
//! | `GET` | `/api/markers` | One marker per tracked entity |
//! | `GET` | `/api/markers/:id` | Single entity marker |
//! | `GET` | `/api/history` | Membership event rows (newest first) |
//! | `GET` | `/api/view` | The full view snapshot |
//!
//! [`ViewSnapshot`]: geowatch_types::ViewSnapshot

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use geowatch_types::EntityId;

use crate::error::ObserverError;
use crate::state::AppState;

/// Default number of history rows returned by `GET /api/history`.
const DEFAULT_HISTORY_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/history` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of rows to return (default 100).
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing server status and API links.
///
/// This is the placeholder dashboard until the Leaflet frontend is
/// wired up against the API.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    let version = snapshot.version;
    let marker_count = snapshot.markers.len();
    let fence_count = snapshot.fences.len();
    let active_count = snapshot.fences.iter().filter(|f| f.active).count();
    let history_count = snapshot.history.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Geowatch Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Geowatch Observer</h1>
    <p class="subtitle">Geofence occupancy monitoring server</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Version</div>
            <div class="value">{version}</div>
        </div>
        <div class="metric">
            <div class="label">Entities</div>
            <div class="value">{marker_count}</div>
        </div>
        <div class="metric">
            <div class="label">Fences</div>
            <div class="value">{fence_count}</div>
        </div>
        <div class="metric">
            <div class="label">Active</div>
            <div class="value">{active_count}</div>
        </div>
        <div class="metric">
            <div class="label">History</div>
            <div class="value">{history_count}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/view">/api/view</a> -- Full view snapshot</li>
        <li><a href="/api/geofences">/api/geofences</a> -- Fence catalog with activity flags</li>
        <li><a href="/api/markers">/api/markers</a> -- One marker per tracked entity</li>
        <li><a href="/api/markers/:id">/api/markers/:id</a> -- Single entity marker</li>
        <li><a href="/api/history">/api/history</a> -- Membership events (?limit=N)</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws/view</code> -- Live view-change stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/view -- full view snapshot
// ---------------------------------------------------------------------------

/// Return the complete committed view snapshot.
pub async fn get_view(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    Json(snapshot.clone())
}

// ---------------------------------------------------------------------------
// GET /api/geofences -- fence catalog with activity flags
// ---------------------------------------------------------------------------

/// List every catalog fence with its geometry and derived `active`
/// flag. The dashboard draws one circle per entry, colored by activity.
pub async fn list_geofences(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    Json(snapshot.fences.clone())
}

// ---------------------------------------------------------------------------
// GET /api/markers -- one marker per tracked entity
// ---------------------------------------------------------------------------

/// List the latest-known marker for every tracked entity.
pub async fn list_markers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.snapshot.read().await;
    Json(snapshot.markers.clone())
}

// ---------------------------------------------------------------------------
// GET /api/markers/:id -- single entity marker
// ---------------------------------------------------------------------------

/// Return the marker for a single tracked entity.
pub async fn get_marker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let entity = EntityId::new(id);
    let snapshot = state.snapshot.read().await;

    let marker = snapshot
        .markers
        .iter()
        .find(|m| m.id == entity)
        .cloned()
        .ok_or_else(|| ObserverError::NotFound(format!("entity {entity}")))?;

    Ok(Json(marker))
}

// ---------------------------------------------------------------------------
// GET /api/history -- membership event rows
// ---------------------------------------------------------------------------

/// Return membership events, newest first.
///
/// The underlying log is arrival-ordered oldest-first; newest-first is
/// this endpoint's presentation choice for the dashboard table.
///
/// # Query Parameters
///
/// - `limit`: maximum rows to return (default 100)
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let snapshot = state.snapshot.read().await;

    let rows: Vec<_> = snapshot.history.iter().rev().take(limit).cloned().collect();

    Json(serde_json::json!({
        "count": rows.len(),
        "total": snapshot.history.len(),
        "events": rows,
    }))
}
