//! Static geofence catalog records.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::FenceName;

/// A named circular region monitored for entity crossings.
///
/// Fence records are loaded once at startup from the catalog endpoint
/// and are read-only for the lifetime of the view. The reconciliation
/// engine never requires the catalog: events for unknown fences are
/// processed normally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Fence {
    /// Unique fence name. Matches the `hook` field on events.
    pub name: FenceName,
    /// Latitude of the fence center.
    pub lat: f64,
    /// Longitude of the fence center.
    pub lon: f64,
    /// Fence radius in meters.
    pub radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fence_deserializes_from_catalog_json() {
        let json = r#"{"name": "harbor-north", "lat": 51.903022, "lon": 4.481119, "radius": 250.0}"#;
        let fence: Result<Fence, _> = serde_json::from_str(json);
        assert_eq!(
            fence.map(|f| f.name).ok(),
            Some(FenceName::new("harbor-north"))
        );
    }
}
