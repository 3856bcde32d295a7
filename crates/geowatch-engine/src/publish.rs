//! View publication: committing derived snapshots to the Observer.
//!
//! After each event that mutated a store, the engine derives a fresh
//! [`ViewSnapshot`] and hands it here. The snapshot replaces the
//! observer's committed copy, then a lightweight [`ViewBroadcast`] goes
//! out to all connected `WebSocket` clients.

use geowatch_observer::state::{AppState, ViewBroadcast};
use geowatch_types::ViewSnapshot;
use tracing::debug;

/// Publish a freshly derived snapshot to the observer.
///
/// The commit waits for the write lock: REST readers hold it only for
/// the duration of a clone, and a notified client must find at least
/// this version behind `/api/view`. The broadcast goes out after the
/// commit so the notification never precedes the state it describes.
pub async fn publish_view(state: &AppState, snapshot: ViewSnapshot) {
    let change = ViewBroadcast::from_snapshot(&snapshot);

    {
        let mut snap = state.snapshot.write().await;
        *snap = snapshot;
    }

    let receivers = state.broadcast(&change);
    debug!(version = change.version, receivers, "view published");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_commits_snapshot_and_notifies() {
        let state = AppState::new();
        let mut rx = state.subscribe();

        let snapshot = ViewSnapshot {
            version: 7,
            ..ViewSnapshot::default()
        };
        publish_view(&state, snapshot).await;

        let committed = state.snapshot.read().await;
        assert_eq!(committed.version, 7);
        drop(committed);

        let change = rx.recv().await.ok();
        assert_eq!(change.map(|c| c.version), Some(7));
    }

    #[tokio::test]
    async fn publish_commits_even_under_reader_contention() {
        // A reader holding the lock delays the commit but never loses
        // it: once the guard drops, the new version lands.
        let state = AppState::new();
        let guard = state.snapshot.read().await;

        let task_state = state.clone();
        let publisher = tokio::spawn(async move {
            let snapshot = ViewSnapshot {
                version: 9,
                ..ViewSnapshot::default()
            };
            publish_view(&task_state, snapshot).await;
        });

        // Let the publisher reach the lock while the reader is active.
        tokio::task::yield_now().await;
        drop(guard);

        assert!(publisher.await.is_ok());
        assert_eq!(state.snapshot.read().await.version, 9);
    }
}
