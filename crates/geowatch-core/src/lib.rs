//! Event reconciliation engine for the geowatch occupancy service.
//!
//! The engine consumes a live stream of geofence-crossing events and
//! maintains a consistent, queryable occupancy state: the most recent
//! event per tracked entity, the set of entities inside each fence, and
//! an arrival-ordered history of membership events. A render-ready view
//! is derived from this state on every mutation.
//!
//! All mutation flows through [`EventIngest`] on a single thread; the
//! stores have no concurrent writer and readers only observe committed
//! state.
//!
//! # Modules
//!
//! - [`latest`] -- per-entity latest accepted event (timestamp-ordered)
//! - [`occupancy`] -- per-fence occupant sets (arrival-ordered)
//! - [`history`] -- append-only membership event log (optionally capped)
//! - [`ingest`] -- validation and serialized dispatch, versioned state
//! - [`view`] -- pure derivation of the render-ready view
//! - [`config`] -- typed YAML configuration

pub mod config;
pub mod history;
pub mod ingest;
pub mod latest;
pub mod occupancy;
pub mod view;

pub use config::{ConfigError, WatchConfig};
pub use history::HistoryLog;
pub use ingest::{EventIngest, IngestError, IngestOutcome};
pub use latest::LatestStateStore;
pub use occupancy::OccupancyTracker;
