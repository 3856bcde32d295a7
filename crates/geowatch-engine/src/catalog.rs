//! One-shot fence catalog fetch.
//!
//! The catalog endpoint returns a JSON array of fence records. It is
//! fetched exactly once at startup; the result is read-only for the
//! life of the view. The reconciliation engine does not depend on the
//! catalog: if the fetch fails, the engine runs with an empty catalog
//! ("fences unknown") and keeps processing live events.

use std::time::Duration;

use geowatch_types::Fence;
use tracing::{debug, info};

/// Errors fetching the fence catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request failed: connection, timeout, non-success
    /// status, or a body that is not a JSON array of fence records.
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fetch the fence catalog from the given endpoint.
///
/// # Errors
///
/// Returns [`CatalogError::Http`] if the request cannot be built or
/// sent, times out, returns a non-success status, or the body does not
/// decode as a JSON array of fences.
pub async fn fetch_fences(url: &str, timeout: Duration) -> Result<Vec<Fence>, CatalogError> {
    debug!(url = url, ?timeout, "fetching fence catalog");

    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let fences = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Fence>>()
        .await?;

    info!(fence_count = fences.len(), "fence catalog loaded");
    Ok(fences)
}
