//! Occupancy tracking: which entities are currently inside each fence.
//!
//! Membership changes apply in strict arrival order, not event-time
//! order. A late-delivered but logically older `exit` therefore evicts
//! a currently valid occupant. This is a deliberate policy choice:
//! applying in arrival order keeps [`apply`](OccupancyTracker::apply)
//! O(log n) per event with no event-time replay, and the latest-state
//! store already reconciles timestamps for marker display. The
//! alternative (timestamp-ordered membership) would require buffering
//! and reordering the stream.
//!
//! Both `inside` and `exit` are idempotent: re-adding a present
//! occupant and removing an absent one are no-ops.

use std::collections::{BTreeMap, BTreeSet};

use geowatch_types::{DetectKind, EntityId, FenceName, GeoEvent};

/// Per-fence sets of entities currently considered inside.
///
/// A fence absent from the map is equivalent to one with an empty set.
/// Once a membership event names a fence, its key is retained even
/// after the last occupant leaves; observable behavior is identical.
#[derive(Debug, Clone, Default)]
pub struct OccupancyTracker {
    sets: BTreeMap<FenceName, BTreeSet<EntityId>>,
}

impl OccupancyTracker {
    /// Create an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sets: BTreeMap::new(),
        }
    }

    /// Apply one event's membership effect in arrival order.
    ///
    /// `inside` adds the entity to the fence's occupancy set, `exit`
    /// removes it; both are no-ops when the set is already in the
    /// target state. Any other detect kind has no membership effect.
    pub fn apply(&mut self, ev: &GeoEvent) {
        let occupants = match ev.detect {
            DetectKind::Inside | DetectKind::Exit => self.sets.entry(ev.hook.clone()).or_default(),
            DetectKind::Other => return,
        };
        if ev.detect == DetectKind::Inside {
            occupants.insert(ev.id.clone());
        } else {
            occupants.remove(&ev.id);
        }
    }

    /// Whether any entity is currently inside the given fence.
    #[must_use]
    pub fn is_active(&self, fence: &FenceName) -> bool {
        self.sets.get(fence).is_some_and(|set| !set.is_empty())
    }

    /// Iterate the entities currently inside the given fence, sorted.
    pub fn occupants(&self, fence: &FenceName) -> impl Iterator<Item = &EntityId> {
        self.sets.get(fence).into_iter().flatten()
    }

    /// Number of fences with at least one occupant.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.sets.values().filter(|set| !set.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ev(id: &str, hook: &str, detect: DetectKind, secs: i64) -> GeoEvent {
        GeoEvent {
            hook: FenceName::new(hook),
            id: EntityId::new(id),
            detect,
            coords: [0.0, 0.0],
            time: DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default(),
            formatted_time: String::new(),
        }
    }

    #[test]
    fn inside_adds_and_exit_removes() {
        let f1 = FenceName::new("f1");
        let mut tracker = OccupancyTracker::new();
        tracker.apply(&ev("a", "f1", DetectKind::Inside, 1));
        assert!(tracker.is_active(&f1));
        tracker.apply(&ev("a", "f1", DetectKind::Exit, 2));
        assert!(!tracker.is_active(&f1));
    }

    #[test]
    fn double_inside_is_idempotent() {
        let f1 = FenceName::new("f1");
        let mut tracker = OccupancyTracker::new();
        tracker.apply(&ev("a", "f1", DetectKind::Inside, 1));
        tracker.apply(&ev("a", "f1", DetectKind::Inside, 2));
        assert_eq!(tracker.occupants(&f1).count(), 1);
        // A single exit then empties the set.
        tracker.apply(&ev("a", "f1", DetectKind::Exit, 3));
        assert!(!tracker.is_active(&f1));
    }

    #[test]
    fn exit_of_absent_entity_is_a_noop() {
        let f1 = FenceName::new("f1");
        let mut tracker = OccupancyTracker::new();
        tracker.apply(&ev("ghost", "f1", DetectKind::Exit, 1));
        assert!(!tracker.is_active(&f1));
        assert_eq!(tracker.occupants(&f1).count(), 0);
    }

    #[test]
    fn other_kind_has_no_membership_effect() {
        let f1 = FenceName::new("f1");
        let mut tracker = OccupancyTracker::new();
        tracker.apply(&ev("a", "f1", DetectKind::Inside, 1));
        tracker.apply(&ev("a", "f1", DetectKind::Other, 2));
        assert!(tracker.is_active(&f1));
        assert_eq!(tracker.active_count(), 1);
    }

    #[test]
    fn membership_follows_arrival_order_not_event_time() {
        // The exit carries an older timestamp but arrives second; it
        // still evicts the occupant (arrival-order policy).
        let f1 = FenceName::new("f1");
        let mut tracker = OccupancyTracker::new();
        tracker.apply(&ev("a", "f1", DetectKind::Inside, 10));
        tracker.apply(&ev("a", "f1", DetectKind::Exit, 5));
        assert!(!tracker.is_active(&f1));
    }

    #[test]
    fn fences_track_independent_sets() {
        let mut tracker = OccupancyTracker::new();
        tracker.apply(&ev("a", "f1", DetectKind::Inside, 1));
        tracker.apply(&ev("b", "f2", DetectKind::Inside, 2));
        tracker.apply(&ev("a", "f1", DetectKind::Exit, 3));
        assert!(!tracker.is_active(&FenceName::new("f1")));
        assert!(tracker.is_active(&FenceName::new("f2")));
        assert_eq!(tracker.active_count(), 1);
    }
}
