//! Latest-state store: the most recent accepted event per tracked entity.
//!
//! This store enforces logical (timestamp) ordering per entity: an event
//! whose `time` is not strictly newer than the stored one is rejected as
//! an out-of-order or duplicate delivery. Arrival order is irrelevant
//! here -- the later-timestamped event wins either way, which is what
//! places each entity's marker at its most recent known position.

use std::collections::BTreeMap;

use geowatch_types::{EntityId, GeoEvent};

/// Per-entity latest accepted event.
///
/// Exactly one entry per entity ever observed; entries are never
/// removed for the life of the view.
#[derive(Debug, Clone, Default)]
pub struct LatestStateStore {
    entries: BTreeMap<EntityId, GeoEvent>,
}

impl LatestStateStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Offer an event as the new latest state for its entity.
    ///
    /// Returns `true` if the store changed: the entity was previously
    /// unknown, or the event's `time` is strictly newer than the stored
    /// entry's. Returns `false` for stale or duplicate deliveries
    /// (stored time >= event time), which leave the store untouched.
    /// Stale rejection is an expected outcome, not an error.
    pub fn update(&mut self, ev: GeoEvent) -> bool {
        match self.entries.get(&ev.id) {
            Some(current) if current.time >= ev.time => false,
            _ => {
                self.entries.insert(ev.id.clone(), ev);
                true
            }
        }
    }

    /// The latest accepted event for one entity, if it was ever observed.
    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&GeoEvent> {
        self.entries.get(id)
    }

    /// Iterate the latest event of every known entity, ordered by id.
    pub fn events(&self) -> impl Iterator<Item = &GeoEvent> {
        self.entries.values()
    }

    /// Number of entities ever observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entity has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
