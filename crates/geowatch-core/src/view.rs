//! Derived view model: pure projections of committed store state.
//!
//! Nothing here holds state. Every function is a deterministic
//! projection of the stores' current contents (plus the static fence
//! catalog), recomputed whenever the caller observes a new state
//! version.

use geowatch_types::{Fence, FenceStatus, GeoEvent, Marker, ViewSnapshot};

use crate::history::HistoryLog;
use crate::ingest::EventIngest;
use crate::latest::LatestStateStore;
use crate::occupancy::OccupancyTracker;

/// One marker per known entity, from its latest accepted event.
#[must_use]
pub fn markers(latest: &LatestStateStore) -> Vec<Marker> {
    latest
        .events()
        .map(|ev| Marker {
            id: ev.id.clone(),
            coords: ev.coords,
            detect: ev.detect,
            formatted_time: ev.formatted_time.clone(),
        })
        .collect()
}

/// Every catalog fence with its derived activity flag.
///
/// Fences appear in catalog order. A fence with zero observed events is
/// reported inactive; occupancy observed for fences outside the catalog
/// is simply not shown (the engine tracks it regardless).
#[must_use]
pub fn fence_status(catalog: &[Fence], occupancy: &OccupancyTracker) -> Vec<FenceStatus> {
    catalog
        .iter()
        .map(|fence| FenceStatus {
            name: fence.name.clone(),
            lat: fence.lat,
            lon: fence.lon,
            radius: fence.radius,
            active: occupancy.is_active(&fence.name),
        })
        .collect()
}

/// Membership events in arrival order, oldest first.
#[must_use]
pub fn history_rows(history: &HistoryLog) -> Vec<GeoEvent> {
    history.rows().cloned().collect()
}

/// Assemble the complete render-ready view at the engine's current
/// state version.
#[must_use]
pub fn snapshot(catalog: &[Fence], ingest: &EventIngest) -> ViewSnapshot {
    ViewSnapshot {
        version: ingest.version(),
        markers: markers(ingest.latest()),
        fences: fence_status(catalog, ingest.occupancy()),
        history: history_rows(ingest.history()),
    }
}
