//! Geofence-crossing event types delivered on the live channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::ids::{EntityId, FenceName};

/// Classification of a geofence event.
///
/// The wire format is an open string union: anything other than
/// `"inside"` or `"exit"` folds into [`Other`](DetectKind::Other) at
/// deserialization. Only `inside` and `exit` affect occupancy and
/// history; `Other` events update the entity's latest state (marker
/// display) and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum DetectKind {
    /// The entity crossed into the fence.
    Inside,
    /// The entity left the fence.
    Exit,
    /// Any other report kind (position ping, dwell, vendor-specific).
    Other,
}

impl DetectKind {
    /// Map a raw wire string to a detect kind.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "inside" => Self::Inside,
            "exit" => Self::Exit,
            _ => Self::Other,
        }
    }

    /// Whether this kind changes fence membership (`inside` or `exit`).
    #[must_use]
    pub const fn is_membership(self) -> bool {
        matches!(self, Self::Inside | Self::Exit)
    }
}

impl<'de> Deserialize<'de> for DetectKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept any string; unknown kinds are valid wire data and fold
        // into `Other` rather than failing the whole event.
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

/// A single geofence-crossing report.
///
/// Created by the external stream, consumed exactly once by the ingest,
/// and never mutated after acceptance. `time` is the logical ordering
/// key for per-entity latest state; `formatted_time` is display-only
/// and never used for logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoEvent {
    /// Name of the geofence the report refers to.
    pub hook: FenceName,
    /// Identifier of the tracked entity.
    pub id: EntityId,
    /// What kind of crossing was detected.
    pub detect: DetectKind,
    /// Reported position as `[lon, lat]`.
    pub coords: [f64; 2],
    /// When the report was produced.
    pub time: DateTime<Utc>,
    /// Pre-formatted display timestamp from the producer.
    #[serde(default)]
    pub formatted_time: String,
}

impl GeoEvent {
    /// Longitude component of the reported position.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        let [lon, _] = self.coords;
        lon
    }

    /// Latitude component of the reported position.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        let [_, lat] = self.coords;
        lat
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn known_detect_kinds_parse() {
        assert_eq!(DetectKind::from_wire("inside"), DetectKind::Inside);
        assert_eq!(DetectKind::from_wire("exit"), DetectKind::Exit);
    }

    #[test]
    fn unknown_detect_folds_to_other() {
        assert_eq!(DetectKind::from_wire("dwell"), DetectKind::Other);
        assert_eq!(DetectKind::from_wire(""), DetectKind::Other);
        assert!(!DetectKind::Other.is_membership());
    }

    #[test]
    fn event_deserializes_from_wire_json() {
        let json = r#"{
            "hook": "harbor-north",
            "id": "truck-17",
            "detect": "inside",
            "coords": [4.481119, 51.903022],
            "time": "2025-06-01T12:00:00Z",
            "formatted_time": "12:00:00"
        }"#;
        let ev: GeoEvent = serde_json::from_str(json).unwrap();
        assert_eq!(ev.hook.as_str(), "harbor-north");
        assert_eq!(ev.detect, DetectKind::Inside);
        assert!((ev.lon() - 4.481_119).abs() < f64::EPSILON);
        assert!((ev.lat() - 51.903_022).abs() < f64::EPSILON);
    }

    #[test]
    fn formatted_time_defaults_to_empty() {
        let json = r#"{
            "hook": "h",
            "id": "e",
            "detect": "exit",
            "coords": [0.0, 0.0],
            "time": "2025-06-01T12:00:00Z"
        }"#;
        let ev: Result<GeoEvent, _> = serde_json::from_str(json);
        assert_eq!(ev.map(|e| e.formatted_time).ok(), Some(String::new()));
    }

    #[test]
    fn unknown_detect_string_still_yields_valid_event() {
        let json = r#"{
            "hook": "h",
            "id": "e",
            "detect": "approaching",
            "coords": [1.0, 2.0],
            "time": "2025-06-01T12:00:00Z"
        }"#;
        let ev: Result<GeoEvent, _> = serde_json::from_str(json);
        assert_eq!(ev.map(|e| e.detect).ok(), Some(DetectKind::Other));
    }
}
