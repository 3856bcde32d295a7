//! Observer API server for the geowatch occupancy service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/view`) for real-time view-change
//!   streaming via [`tokio::sync::broadcast`]
//! - **REST endpoints** for querying the derived view (fence catalog
//!   with activity flags, entity markers, membership history)
//! - **Minimal HTML status page** (`GET /`) showing the current state
//!   version and links to API endpoints
//!
//! # Architecture
//!
//! The observer reads from a committed in-memory [`ViewSnapshot`] that
//! the engine replaces on every state mutation. All REST reads go
//! against this snapshot, so the observer never blocks event intake.
//! `WebSocket` clients receive change notifications via a broadcast
//! channel with automatic lag handling.
//!
//! The observer is the rendering boundary: it serves derived state to
//! the map dashboard and never mutates the engine's stores.
//!
//! [`ViewSnapshot`]: geowatch_types::ViewSnapshot

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::{AppState, ViewBroadcast};
