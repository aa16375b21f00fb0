//! Error types for the leverdag server.
//!
//! This module provides the error hierarchy used across the server: configuration errors
//! raised at startup, upstream delivery date errors raised by the fetch path, and the
//! aggregate [`Error`] returned while building and serving the application. Request handlers
//! never fail: upstream errors end in generated dates and rate limiting answers 429 itself.

pub mod config;
pub mod delivery_date;
pub mod retry;

use thiserror::Error;

use crate::server::error::{config::ConfigError, delivery_date::DeliveryDateError};

/// Main error type for the leverdag server.
///
/// Aggregates the domain-specific error types and external library errors into a single
/// type with `#[from]` conversions so the `?` operator works across layers.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Upstream delivery date errors (timeouts, HTTP status, malformed bodies)
/// - Infrastructure errors (HTTP client construction, socket binding, job scheduler)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Upstream delivery date API error.
    #[error(transparent)]
    DeliveryDateError(#[from] DeliveryDateError),
    /// HTTP client construction error.
    #[error(transparent)]
    HttpClientError(#[from] reqwest::Error),
    /// Socket bind or serve error.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Job scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}
