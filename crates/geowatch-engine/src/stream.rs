//! NATS integration for the live geofence event channel.
//!
//! The external detector publishes one JSON-encoded `GeoEvent` per
//! message on a single subject. [`EventStream`] manages the connection
//! and the subscription lifecycle; the intake loop in `main` drains the
//! subscriber one message at a time, which gives the engine its strict
//! per-event serialization for free.

use tracing::{debug, info};

/// Errors that can occur on the live event channel.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Failed to connect to or communicate with the NATS server.
    #[error("NATS error: {0}")]
    Nats(String),
}

/// NATS client wrapper for the geofence event channel.
///
/// Manages a single NATS connection and provides methods for
/// subscribing to the event subject and tearing the subscription down
/// when the view is retired.
pub struct EventStream {
    client: async_nats::Client,
}

impl EventStream {
    /// Connect to a NATS server.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Nats`] if the connection cannot be
    /// established.
    pub async fn connect(url: &str) -> Result<Self, StreamError> {
        info!(url = url, "connecting to NATS server");
        let client = async_nats::connect(url)
            .await
            .map_err(|e| StreamError::Nats(format!("failed to connect to {url}: {e}")))?;
        info!("NATS connection established");
        Ok(Self { client })
    }

    /// Subscribe to the geofence event subject.
    ///
    /// Returns a subscription yielding one message per delivered event,
    /// in delivery order.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Nats`] if the subscription fails.
    pub async fn subscribe(&self, subject: &str) -> Result<async_nats::Subscriber, StreamError> {
        debug!(subject = subject, "subscribing to geofence events");
        let subscriber = self
            .client
            .subscribe(subject.to_owned())
            .await
            .map_err(|e| StreamError::Nats(format!("failed to subscribe to {subject}: {e}")))?;
        info!(subject = subject, "subscribed to geofence events");
        Ok(subscriber)
    }
}

/// Tear down a subscription, releasing the underlying interest.
///
/// Called when the consuming view is retired. Unsubscribe failures are
/// logged and swallowed -- the connection is being dropped anyway.
pub async fn teardown(mut subscriber: async_nats::Subscriber) {
    if let Err(e) = subscriber.unsubscribe().await {
        debug!(error = %e, "unsubscribe failed during teardown");
    }
    info!("event subscription torn down");
}
