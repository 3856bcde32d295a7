//! Event intake: validation and serialized dispatch into the stores.
//!
//! [`EventIngest`] is the single serialization point of the engine. It
//! owns the three stores; all mutation flows through one call site on
//! one thread, so readers only ever observe committed state and no
//! locking is needed around the stores themselves.
//!
//! Malformed payloads are rejected before any store is touched -- a
//! failed event leaves the engine exactly as it was.

use geowatch_types::GeoEvent;

use crate::history::HistoryLog;
use crate::latest::LatestStateStore;
use crate::occupancy::OccupancyTracker;

/// Reasons a raw event is discarded at intake.
///
/// None of these are fatal; the engine drops the event and continues
/// with the next delivery.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The payload is not a structurally valid event: missing fields,
    /// wrong types, a non-array `coords`, or an unparseable timestamp.
    #[error("malformed event: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The entity id is present but empty.
    #[error("event has an empty entity id")]
    EmptyEntityId,

    /// The fence name (`hook`) is present but empty.
    #[error("event has an empty fence name")]
    EmptyFenceName,

    /// A coordinate is NaN or infinite.
    #[error("event has a non-finite coordinate: [{0}, {1}]")]
    NonFiniteCoords(f64, f64),
}

/// What one accepted event did to the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Whether the latest-state entry for the entity changed. `false`
    /// means the delivery was stale or duplicate for that entity --
    /// an expected outcome, not an error.
    pub latest_updated: bool,
    /// Whether the event was a membership (`inside`/`exit`) event and
    /// was therefore applied to occupancy and history.
    pub membership_event: bool,
    /// The state version after this event. Equal to the previous
    /// version when nothing mutated.
    pub version: u64,
}

/// The reconciliation engine: three stores behind one writer.
///
/// The `version` counter increments exactly when at least one store
/// mutated, so a consumer republishing the derived view can key off
/// version changes alone.
#[derive(Debug, Default)]
pub struct EventIngest {
    latest: LatestStateStore,
    occupancy: OccupancyTracker,
    history: HistoryLog,
    version: u64,
}

impl EventIngest {
    /// Create an engine with an unbounded history log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: LatestStateStore::new(),
            occupancy: OccupancyTracker::new(),
            history: HistoryLog::new(),
            version: 0,
        }
    }

    /// Create an engine whose history keeps only the most recent
    /// `capacity` membership events.
    #[must_use]
    pub const fn with_history_capacity(capacity: usize) -> Self {
        Self {
            latest: LatestStateStore::new(),
            occupancy: OccupancyTracker::new(),
            history: HistoryLog::with_capacity(capacity),
            version: 0,
        }
    }

    /// Validate and process one raw event payload.
    ///
    /// On validation failure the event is discarded and no store is
    /// mutated.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if the payload does not deserialize to a
    /// well-formed event or fails semantic validation.
    pub fn handle(&mut self, raw: &[u8]) -> Result<IngestOutcome, IngestError> {
        let ev: GeoEvent = serde_json::from_slice(raw)?;
        validate(&ev)?;
        Ok(self.accept(ev))
    }

    /// Process one already-validated event.
    ///
    /// Dispatch order is fixed: latest-state first, then (for
    /// membership events) occupancy and history. Occupancy and history
    /// apply regardless of whether the latest-state update was accepted
    /// -- they follow arrival order, not event-time order.
    pub fn accept(&mut self, ev: GeoEvent) -> IngestOutcome {
        let membership_event = ev.detect.is_membership();

        let latest_updated = self.latest.update(ev.clone());
        if membership_event {
            self.occupancy.apply(&ev);
            self.history.append(&ev);
        }

        if latest_updated || membership_event {
            self.version = self.version.wrapping_add(1);
        }

        IngestOutcome {
            latest_updated,
            membership_event,
            version: self.version,
        }
    }

    /// The per-entity latest-state store.
    #[must_use]
    pub const fn latest(&self) -> &LatestStateStore {
        &self.latest
    }

    /// The per-fence occupancy tracker.
    #[must_use]
    pub const fn occupancy(&self) -> &OccupancyTracker {
        &self.occupancy
    }

    /// The membership-event history log.
    #[must_use]
    pub const fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// The current state version. Starts at 0; increments once per
    /// event that mutated at least one store.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }
}

/// Semantic validation beyond structural deserialization.
fn validate(ev: &GeoEvent) -> Result<(), IngestError> {
    if ev.id.is_empty() {
        return Err(IngestError::EmptyEntityId);
    }
    if ev.hook.is_empty() {
        return Err(IngestError::EmptyFenceName);
    }
    let [lon, lat] = ev.coords;
    if !lon.is_finite() || !lat.is_finite() {
        return Err(IngestError::NonFiniteCoords(lon, lat));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::{DateTime, Utc};
    use geowatch_types::{DetectKind, EntityId, FenceName};

    fn ev(id: &str, hook: &str, detect: DetectKind, secs: i64) -> GeoEvent {
        GeoEvent {
            hook: FenceName::new(hook),
            id: EntityId::new(id),
            detect,
            coords: [4.48, 51.90],
            time: DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default(),
            formatted_time: String::new(),
        }
    }

    fn raw(id: &str, hook: &str, detect: &str, secs: i64) -> Vec<u8> {
        let time = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();
        serde_json::to_vec(&serde_json::json!({
            "hook": hook,
            "id": id,
            "detect": detect,
            "coords": [4.48, 51.90],
            "time": time,
        }))
        .unwrap()
    }

    #[test]
    fn accepted_event_reaches_all_stores() {
        let mut ingest = EventIngest::new();
        let outcome = ingest.accept(ev("a", "f1", DetectKind::Inside, 1));
        assert!(outcome.latest_updated);
        assert!(outcome.membership_event);
        assert_eq!(outcome.version, 1);
        assert_eq!(ingest.latest().len(), 1);
        assert!(ingest.occupancy().is_active(&FenceName::new("f1")));
        assert_eq!(ingest.history().len(), 1);
    }

    #[test]
    fn stale_membership_event_still_applies_to_occupancy_and_history() {
        // A late-delivered exit with an older timestamp: rejected by the
        // latest-state store, but occupancy and history follow arrival
        // order and apply it anyway.
        let mut ingest = EventIngest::new();
        ingest.accept(ev("a", "f1", DetectKind::Inside, 10));
        let outcome = ingest.accept(ev("a", "f1", DetectKind::Exit, 5));
        assert!(!outcome.latest_updated);
        assert!(outcome.membership_event);
        assert!(!ingest.occupancy().is_active(&FenceName::new("f1")));
        assert_eq!(ingest.history().len(), 2);
    }

    #[test]
    fn stale_reject_scenario() {
        // Scenario: inside at t=5 then inside at t=3 -- the t=5 entry
        // survives and the second update reports no latest change.
        let mut ingest = EventIngest::new();
        ingest.accept(ev("a", "f1", DetectKind::Inside, 5));
        let outcome = ingest.accept(ev("a", "f1", DetectKind::Inside, 3));
        assert!(!outcome.latest_updated);
        let stored = ingest.latest().get(&EntityId::new("a")).map(|e| e.time);
        assert_eq!(stored, Some(DateTime::<Utc>::from_timestamp(5, 0).unwrap()));
    }

    #[test]
    fn malformed_payload_mutates_nothing() {
        let mut ingest = EventIngest::new();
        // Missing `detect` entirely.
        let bad = br#"{"hook": "f1", "id": "a", "coords": [1.0, 2.0], "time": "2025-06-01T12:00:00Z"}"#;
        let result = ingest.handle(bad);
        assert!(matches!(result, Err(IngestError::Malformed(_))));
        assert_eq!(ingest.latest().len(), 0);
        assert_eq!(ingest.history().len(), 0);
        assert_eq!(ingest.version(), 0);

        // Subsequent valid events process normally.
        let outcome = ingest.handle(&raw("a", "f1", "inside", 1)).unwrap();
        assert!(outcome.latest_updated);
        assert_eq!(ingest.version(), 1);
    }

    #[test]
    fn empty_identifiers_are_rejected() {
        let mut ingest = EventIngest::new();
        let no_id = ingest.handle(&raw("", "f1", "inside", 1));
        assert!(matches!(no_id, Err(IngestError::EmptyEntityId)));
        let no_hook = ingest.handle(&raw("a", "", "inside", 1));
        assert!(matches!(no_hook, Err(IngestError::EmptyFenceName)));
        assert_eq!(ingest.version(), 0);
    }

    #[test]
    fn non_finite_coords_are_rejected() {
        let mut ingest = EventIngest::new();
        let mut event = ev("a", "f1", DetectKind::Inside, 1);
        event.coords = [f64::NAN, 51.90];
        let result = validate(&event);
        assert!(matches!(result, Err(IngestError::NonFiniteCoords(_, _))));
        // A null coordinate fails structural deserialization instead.
        let bad = br#"{"hook": "f1", "id": "a", "detect": "inside", "coords": [null, 51.9], "time": "2025-06-01T12:00:00Z"}"#;
        assert!(matches!(ingest.handle(bad), Err(IngestError::Malformed(_))));
        assert_eq!(ingest.version(), 0);
    }

    #[test]
    fn version_only_moves_when_a_store_mutates() {
        let mut ingest = EventIngest::new();
        ingest.accept(ev("a", "f1", DetectKind::Other, 10));
        assert_eq!(ingest.version(), 1);
        // Stale non-membership event: nothing changes anywhere.
        let outcome = ingest.accept(ev("a", "f1", DetectKind::Other, 5));
        assert!(!outcome.latest_updated);
        assert!(!outcome.membership_event);
        assert_eq!(outcome.version, 1);
        assert_eq!(ingest.version(), 1);
    }

    #[test]
    fn other_events_update_latest_but_not_membership() {
        let mut ingest = EventIngest::new();
        let outcome = ingest.handle(&raw("a", "f1", "dwell", 1)).unwrap();
        assert!(outcome.latest_updated);
        assert!(!outcome.membership_event);
        assert!(!ingest.occupancy().is_active(&FenceName::new("f1")));
        assert_eq!(ingest.history().len(), 0);
    }

    #[test]
    fn history_capacity_is_honored_through_ingest() {
        let mut ingest = EventIngest::with_history_capacity(2);
        for i in 0..5 {
            ingest.accept(ev("a", "f1", DetectKind::Inside, i));
        }
        assert_eq!(ingest.history().len(), 2);
    }
}
