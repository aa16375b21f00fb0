use std::time::Duration;

use thiserror::Error;

/// Failures of the upstream delivery date fetch path.
///
/// Only [`DeliveryDateError::RetriesExhausted`] leaves the retry loop; the delivery date service
/// catches it and serves generated dates instead.
#[derive(Error, Debug)]
pub enum DeliveryDateError {
    /// The attempt did not complete within the configured API timeout.
    #[error("Delivery date API request timed out after {0:?}")]
    UpstreamTimeout(Duration),
    /// The upstream answered with a non-2xx status.
    #[error("Delivery date API returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    /// Connection, TLS or other transport failure.
    #[error("Delivery date API request failed: {0}")]
    UpstreamRequest(#[source] reqwest::Error),
    /// The upstream answered 2xx with a body that is not JSON.
    #[error("Delivery date API returned an unreadable body: {0}")]
    UpstreamDecode(String),
    /// Every attempt failed; carries the most recent failure when at least one attempt ran.
    #[error("Delivery date API failed after {attempts} attempt(s)")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Option<Box<DeliveryDateError>>,
    },
}
