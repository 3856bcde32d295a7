//! `WebSocket` handler for real-time view-change streaming.
//!
//! Clients connect to `GET /ws/view` and receive a JSON-encoded
//! [`ViewBroadcast`] message each time the engine commits a state
//! mutation. The first frame carries a summary of the currently
//! committed snapshot, so a freshly connected dashboard knows the
//! state version without a REST round-trip.
//!
//! If a client falls behind, lagged messages are silently skipped and
//! the client resumes from the most recent change.
//!
//! [`broadcast::Receiver`]: tokio::sync::broadcast::Receiver

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::state::{AppState, ViewBroadcast};

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming view changes.
///
/// # Route
///
/// `GET /ws/view`
pub async fn ws_view(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Serialize a view change and send it as a text frame.
///
/// Returns `false` when the client is gone and the connection should
/// be dropped.
async fn send_change(socket: &mut WebSocket, change: &ViewBroadcast) -> bool {
    let json = match serde_json::to_string(change) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize view broadcast: {e}");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!("WebSocket client disconnected (send failed)");
        return false;
    }
    true
}

/// Handle the `WebSocket` lifecycle: greet the client with the current
/// snapshot version, then forward each committed view change.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    // Subscribe before reading the snapshot so a mutation landing in
    // between is not lost: the client may see it twice, never zero times.
    let mut rx = state.subscribe();

    let current = {
        let snapshot = state.snapshot.read().await;
        ViewBroadcast::from_snapshot(&snapshot)
    };
    if !send_change(&mut socket, &current).await {
        return;
    }

    loop {
        tokio::select! {
            // Receive a view-change notification from the engine.
            result = rx.recv() => {
                match result {
                    Ok(change) => {
                        if !send_change(&mut socket, &change).await {
                            return;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            // Check if the client sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let pong = Message::Pong(data);
                        if socket.send(pong).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    _ => {
                        // Ignore other message types (text, binary from client).
                    }
                }
            }
        }
    }
}
