//! Geowatch engine binary.
//!
//! This is the main entry point that wires together the fence catalog
//! fetch, the NATS event subscription, the reconciliation engine, and
//! the Observer API server. It loads configuration, initializes all
//! subsystems, and drains the event channel until terminated.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `geowatch-config.yaml`
//! 3. Start the Observer API server
//! 4. Fetch the static fence catalog (degrades to empty on failure)
//! 5. Connect to NATS and subscribe to the event subject
//! 6. Publish the initial (empty) view
//! 7. Drain events one at a time until Ctrl-C
//! 8. Tear down the subscription, drain the server, log the result

mod catalog;
mod error;
mod publish;
mod stream;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt as _;
use geowatch_core::config::WatchConfig;
use geowatch_core::ingest::EventIngest;
use geowatch_core::view;
use geowatch_observer::server::{ServerConfig, start_server};
use geowatch_observer::state::AppState;
use geowatch_types::Fence;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::stream::EventStream;

/// Application entry point for the geowatch engine.
///
/// Initializes all subsystems and runs the event intake loop. Returns
/// an error code on failure.
///
/// # Errors
///
/// Returns an error if any initialization step fails. Event-level
/// failures (malformed payloads, stale updates) never abort the loop.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("geowatch-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        nats_url = config.stream.nats_url,
        subject = config.stream.subject,
        catalog_url = config.catalog.url,
        history_capacity = ?config.history.capacity,
        "Configuration loaded"
    );

    // 3. Start the Observer API server.
    let app_state = Arc::new(AppState::new());
    let server_config = ServerConfig {
        host: config.observer.host.clone(),
        port: config.observer.port,
    };
    let server_state = Arc::clone(&app_state);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(&server_config, server_state, shutdown_rx).await {
            warn!(error = %e, "Observer server exited");
        }
    });
    info!(port = config.observer.port, "Observer API server started");

    // 4. Fetch the static fence catalog. A failed fetch is not fatal:
    //    occupancy and history do not depend on the catalog, so the
    //    engine continues with "fences unknown".
    let timeout = Duration::from_millis(config.catalog.timeout_ms);
    let fences: Vec<Fence> = match catalog::fetch_fences(&config.catalog.url, timeout).await {
        Ok(fences) => fences,
        Err(e) => {
            warn!(error = %e, "fence catalog unavailable, continuing with empty catalog");
            Vec::new()
        }
    };

    // 5. Connect to NATS and subscribe to the event subject.
    let event_stream = EventStream::connect(&config.stream.nats_url)
        .await
        .map_err(EngineError::from)?;
    let mut subscriber = event_stream
        .subscribe(&config.stream.subject)
        .await
        .map_err(EngineError::from)?;

    // 6. Create the reconciliation engine and publish the initial view
    //    so the dashboard sees the catalog before any event arrives.
    let mut ingest = match config.history.capacity {
        Some(capacity) => EventIngest::with_history_capacity(capacity),
        None => EventIngest::new(),
    };
    publish::publish_view(&app_state, view::snapshot(&fences, &ingest)).await;

    info!("entering event intake loop");

    // 7. Drain events one at a time. Processing is strictly serialized:
    //    no event's handling overlaps another's.
    let mut published_version = ingest.version();
    loop {
        tokio::select! {
            message = subscriber.next() => {
                let Some(message) = message else {
                    // Subscription closed: connection loss. Reconnecting
                    // is the transport operator's concern; existing state
                    // stays intact and the process exits cleanly.
                    warn!("event subscription closed, shutting down");
                    break;
                };
                match ingest.handle(&message.payload) {
                    Ok(outcome) => {
                        if outcome.version != published_version {
                            published_version = outcome.version;
                            publish::publish_view(&app_state, view::snapshot(&fences, &ingest)).await;
                        }
                        debug!(
                            version = outcome.version,
                            latest_updated = outcome.latest_updated,
                            membership_event = outcome.membership_event,
                            "event processed"
                        );
                    }
                    Err(e) => {
                        // Malformed events are discarded without touching
                        // any store; the next delivery processes normally.
                        debug!(error = %e, "discarded malformed event");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
        }
    }

    // 8. Tear down the subscription and drain the server.
    stream::teardown(subscriber).await;
    if shutdown_tx.send(()).is_err() {
        debug!("observer server already stopped");
    }
    if let Err(e) = server_handle.await {
        warn!(error = %e, "observer server task failed to join");
    }

    info!(
        final_version = ingest.version(),
        entities_tracked = ingest.latest().len(),
        history_rows = ingest.history().len(),
        "geowatch-engine shutdown complete"
    );

    Ok(())
}

/// Load the engine configuration from `geowatch-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// falls back to built-in defaults when the file does not exist.
fn load_config() -> Result<WatchConfig, EngineError> {
    let config_path = Path::new("geowatch-config.yaml");
    if config_path.exists() {
        info!(path = %config_path.display(), "loading configuration file");
        Ok(WatchConfig::from_file(config_path)?)
    } else {
        info!("no configuration file found, using defaults");
        let mut config = WatchConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
