//! Shared type definitions for the geowatch occupancy service.
//!
//! This crate is the single source of truth for all types used across
//! the geowatch workspace. Types defined here flow downstream to
//! `TypeScript` via `ts-rs` for the map dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string wrappers for entity and fence identifiers
//! - [`event`] -- The wire event type and its detect-kind classification
//! - [`fence`] -- Static geofence catalog records
//! - [`view`] -- Render-ready view types (markers, fence status, snapshots)

pub mod event;
pub mod fence;
pub mod ids;
pub mod view;

// Re-export all public types at crate root for convenience.
pub use event::{DetectKind, GeoEvent};
pub use fence::Fence;
pub use ids::{EntityId, FenceName};
pub use view::{FenceStatus, Marker, ViewSnapshot};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::EntityId::export_all();
        let _ = crate::ids::FenceName::export_all();

        // Wire types
        let _ = crate::event::DetectKind::export_all();
        let _ = crate::event::GeoEvent::export_all();
        let _ = crate::fence::Fence::export_all();

        // View types
        let _ = crate::view::Marker::export_all();
        let _ = crate::view::FenceStatus::export_all();
        let _ = crate::view::ViewSnapshot::export_all();
    }
}
