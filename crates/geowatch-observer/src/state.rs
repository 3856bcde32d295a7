//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for view-change
//! notifications and the in-memory [`ViewSnapshot`] that the REST
//! endpoints serve. The engine is the only writer; every handler here
//! reads committed snapshots and never touches the stores.

use std::sync::Arc;

use geowatch_types::ViewSnapshot;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the broadcast channel for view-change notifications.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// JSON-serializable view-change notification pushed over the
/// `WebSocket`.
///
/// This is a lightweight projection of the full [`ViewSnapshot`]; a
/// client that sees the version move fetches whatever detail it needs
/// from the REST endpoints (or `/api/view` for everything).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ViewBroadcast {
    /// The state version this notification corresponds to.
    pub version: u64,
    /// Number of entities with a marker.
    pub tracked_entities: usize,
    /// Number of catalog fences currently active.
    pub active_fences: usize,
    /// Number of rows in the membership history.
    pub history_len: usize,
}

impl ViewBroadcast {
    /// Summarize a committed snapshot into a change notification.
    #[must_use]
    pub fn from_snapshot(snapshot: &ViewSnapshot) -> Self {
        Self {
            version: snapshot.version,
            tracked_entities: snapshot.markers.len(),
            active_fences: snapshot.fences.iter().filter(|f| f.active).count(),
            history_len: snapshot.history.len(),
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
/// The broadcast sender pushes view-change notifications to all
/// connected `WebSocket` clients; the snapshot is a read-write lock
/// whose sole writer is the engine's publish step.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for view-change notifications.
    pub tx: broadcast::Sender<ViewBroadcast>,
    /// The current committed view snapshot.
    pub snapshot: Arc<RwLock<ViewSnapshot>>,
}

impl AppState {
    /// Create a new application state with an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(ViewSnapshot::default())),
        }
    }

    /// Subscribe to the view-change broadcast channel.
    ///
    /// Returns a receiver that will yield a [`ViewBroadcast`] for every
    /// committed state mutation the engine publishes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ViewBroadcast> {
        self.tx.subscribe()
    }

    /// Publish a view-change notification to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, change: &ViewBroadcast) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(change.clone()).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
