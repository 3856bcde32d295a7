//! Append-only history of membership-changing events.
//!
//! The log records every accepted `inside`/`exit` event in arrival
//! order, independent of how latest-state or occupancy converged. It is
//! unbounded by default; an optional capacity turns it into a FIFO
//! window over the most recent entries.

use std::collections::VecDeque;

use geowatch_types::GeoEvent;

/// Arrival-ordered audit trail of `inside`/`exit` events.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: VecDeque<GeoEvent>,
    capacity: Option<usize>,
}

impl HistoryLog {
    /// Create an unbounded log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: None,
        }
    }

    /// Create a log keeping only the most recent `capacity` entries,
    /// evicting the oldest when the cap is exceeded.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: Some(capacity),
        }
    }

    /// Record one event, if it is a membership (`inside`/`exit`) event.
    ///
    /// Other detect kinds are not part of the audit trail and are
    /// ignored here.
    pub fn append(&mut self, ev: &GeoEvent) {
        if !ev.detect.is_membership() {
            return;
        }
        self.entries.push_back(ev.clone());
        if let Some(cap) = self.capacity {
            while self.entries.len() > cap {
                self.entries.pop_front();
            }
        }
    }

    /// Iterate recorded events in arrival order, oldest first.
    ///
    /// Display direction (oldest- vs newest-first) is a presentation
    /// choice made by the rendering boundary, not by this store.
    pub fn rows(&self) -> impl Iterator<Item = &GeoEvent> {
        self.entries.iter()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured capacity, if bounded.
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use geowatch_types::{DetectKind, EntityId, FenceName};

    fn ev(id: &str, detect: DetectKind, secs: i64) -> GeoEvent {
        GeoEvent {
            hook: FenceName::new("f1"),
            id: EntityId::new(id),
            detect,
            coords: [0.0, 0.0],
            time: DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default(),
            formatted_time: String::new(),
        }
    }

    #[test]
    fn only_membership_events_are_recorded() {
        let mut log = HistoryLog::new();
        log.append(&ev("a", DetectKind::Inside, 1));
        log.append(&ev("a", DetectKind::Other, 2));
        log.append(&ev("a", DetectKind::Exit, 3));
        assert_eq!(log.len(), 2);
        let kinds: Vec<_> = log.rows().map(|e| e.detect).collect();
        assert_eq!(kinds, vec![DetectKind::Inside, DetectKind::Exit]);
    }

    #[test]
    fn rows_preserve_arrival_order() {
        let mut log = HistoryLog::new();
        // Timestamps deliberately out of order; arrival order rules.
        log.append(&ev("a", DetectKind::Inside, 9));
        log.append(&ev("b", DetectKind::Inside, 3));
        log.append(&ev("a", DetectKind::Exit, 6));
        let ids: Vec<_> = log.rows().map(|e| e.id.as_str().to_owned()).collect();
        assert_eq!(ids, vec!["a", "b", "a"]);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut log = HistoryLog::with_capacity(2);
        log.append(&ev("a", DetectKind::Inside, 1));
        log.append(&ev("b", DetectKind::Inside, 2));
        log.append(&ev("c", DetectKind::Inside, 3));
        assert_eq!(log.len(), 2);
        let ids: Vec<_> = log.rows().map(|e| e.id.as_str().to_owned()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(log.capacity(), Some(2));
    }

    #[test]
    fn unbounded_log_keeps_everything() {
        let mut log = HistoryLog::new();
        for i in 0..100 {
            log.append(&ev("a", DetectKind::Inside, i));
        }
        assert_eq!(log.len(), 100);
        assert_eq!(log.capacity(), None);
    }
}
