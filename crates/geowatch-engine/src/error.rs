//! Error types for the geowatch engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and event intake.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: geowatch_core::config::ConfigError,
    },

    /// NATS connection or subscription failed.
    #[error("stream error: {source}")]
    Stream {
        /// The underlying stream error.
        #[from]
        source: crate::stream::StreamError,
    },
}
