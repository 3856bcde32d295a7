//! Configuration loading and typed config structures for geowatch.
//!
//! The canonical configuration lives in `geowatch-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads and validates
//! the file. Infrastructure URLs can be overridden via environment
//! variables for containerized deployments.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level geowatch configuration.
///
/// Mirrors the structure of `geowatch-config.yaml`. All fields have
/// defaults, so an empty file (or a missing one, at the caller's
/// discretion) yields a working local setup.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WatchConfig {
    /// Live event channel settings.
    #[serde(default)]
    pub stream: StreamConfig,

    /// Static fence catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// History log settings.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Observer HTTP server settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WatchConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for infrastructure
    /// URLs:
    /// - `NATS_URL` overrides `stream.nats_url`
    /// - `CATALOG_URL` overrides `catalog.url`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Pure: no environment lookups, what the string says is what you
    /// get. [`from_file`](Self::from_file) layers the env overrides on
    /// top.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply environment-variable overrides for infrastructure URLs.
    ///
    /// - `NATS_URL` overrides `stream.nats_url`
    /// - `CATALOG_URL` overrides `catalog.url`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("NATS_URL") {
            self.stream.nats_url = url;
        }
        if let Ok(url) = std::env::var("CATALOG_URL") {
            self.catalog.url = url;
        }
    }
}

/// Live event channel (NATS) settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamConfig {
    /// NATS server URL.
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// Subject carrying geofence events.
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            nats_url: default_nats_url(),
            subject: default_subject(),
        }
    }
}

/// Static fence catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// HTTP endpoint returning the JSON array of fence records.
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// Request timeout in milliseconds for the one-shot fetch.
    #[serde(default = "default_catalog_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            timeout_ms: default_catalog_timeout_ms(),
        }
    }
}

/// History log settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of membership events retained, oldest evicted
    /// first. Unbounded when absent.
    #[serde(default)]
    pub capacity: Option<usize>,
}

/// Observer HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// The host address to bind to.
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_nats_url() -> String {
    String::from("nats://127.0.0.1:4222")
}

fn default_subject() -> String {
    String::from("geofence.events")
}

fn default_catalog_url() -> String {
    String::from("http://127.0.0.1:5000/api/geofences")
}

const fn default_catalog_timeout_ms() -> u64 {
    5000
}

fn default_observer_host() -> String {
    String::from("0.0.0.0")
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}
