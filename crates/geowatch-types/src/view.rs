//! Render-ready view types served to the map dashboard.
//!
//! Every value here is a deterministic projection of committed store
//! state. The dashboard reads these over the observer API and never
//! mutates the stores directly.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::event::{DetectKind, GeoEvent};
use crate::ids::{EntityId, FenceName};

/// One map marker: the latest accepted event for a tracked entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Marker {
    /// The tracked entity this marker represents.
    pub id: EntityId,
    /// Marker position as `[lon, lat]` from the latest event.
    pub coords: [f64; 2],
    /// Detect kind of the latest event (shown in the marker popup).
    pub detect: DetectKind,
    /// Display timestamp of the latest event.
    pub formatted_time: String,
}

/// One catalog fence with its derived activity flag.
///
/// `active` is true iff the fence's occupancy set is non-empty. Fences
/// with zero observed events are always inactive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FenceStatus {
    /// Fence name.
    pub name: FenceName,
    /// Latitude of the fence center.
    pub lat: f64,
    /// Longitude of the fence center.
    pub lon: f64,
    /// Fence radius in meters.
    pub radius: f64,
    /// Whether any entity is currently inside the fence.
    pub active: bool,
}

/// The complete render-ready view at one state version.
///
/// `version` increases by one for every event that mutated a store, so
/// consumers can detect missed updates by comparing versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ViewSnapshot {
    /// State version this snapshot was derived from.
    pub version: u64,
    /// One marker per known entity.
    pub markers: Vec<Marker>,
    /// Every catalog fence with its activity flag.
    pub fences: Vec<FenceStatus>,
    /// Membership events in arrival order, oldest first.
    pub history: Vec<GeoEvent>,
}
