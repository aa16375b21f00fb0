//! Delivery date sourcing.
//!
//! [`DeliveryDateService`] answers "which dates can be offered at checkout" by consulting, in
//! order, the mock override, the in-memory cache and the upstream API (with bounded retries),
//! falling back to generated dates when the upstream is unavailable. It never fails to the
//! caller.

pub mod cache;
pub mod client;
pub mod mock;

#[cfg(test)]
mod tests;

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{
    model::delivery_date::DeliveryDate,
    server::{
        config::Config,
        error::delivery_date::DeliveryDateError,
        service::{
            delivery_date::{
                cache::DeliveryDateCache, client::DeliveryDateClient,
                mock::generate_mock_delivery_dates,
            },
            retry::RetryContext,
        },
        util::time::Clock,
    },
};

/// Where a set of resolved dates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrigin {
    /// Fetched from the upstream API during this call.
    Live { fetched_at: DateTime<Utc> },
    /// Served from a cache entry fetched earlier.
    Cached { fetched_at: DateTime<Utc> },
    /// Generated, either by the mock override or as a fallback.
    Mock,
}

/// Delivery dates along with their [`DateOrigin`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDates {
    pub dates: Vec<DeliveryDate>,
    pub origin: DateOrigin,
}

pub struct DeliveryDateService<'a> {
    client: &'a DeliveryDateClient,
    cache: &'a DeliveryDateCache,
    clock: &'a dyn Clock,
    config: &'a Config,
    initial_backoff: Option<Duration>,
}

impl<'a> DeliveryDateService<'a> {
    /// Creates a new instance of [`DeliveryDateService`]
    pub fn new(
        client: &'a DeliveryDateClient,
        cache: &'a DeliveryDateCache,
        clock: &'a dyn Clock,
        config: &'a Config,
    ) -> Self {
        Self {
            client,
            cache,
            clock,
            config,
            initial_backoff: None,
        }
    }

    /// Overrides the 1s backoff applied after the first failed upstream attempt.
    pub fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = Some(initial_backoff);
        self
    }

    /// Returns the delivery dates to offer.
    pub async fn get_delivery_dates(&self) -> Vec<DeliveryDate> {
        self.resolve().await.dates
    }

    /// Returns the delivery dates to offer along with where they came from.
    ///
    /// 1. Mock mode enabled: generated dates, the cache and upstream are never touched.
    /// 2. Fresh cache entry: its data, unchanged.
    /// 3. Upstream fetch with retries: on success the cache is overwritten and the data returned.
    /// 4. Every attempt failed: generated dates, which are never cached so the next call tries
    ///    the upstream again.
    pub async fn resolve(&self) -> ResolvedDates {
        let flags = &self.config.flags;

        if flags.enable_mock_mode {
            tracing::debug!("Mock mode enabled, serving generated delivery dates");
            return self.mock();
        }

        if let Some(entry) = self.cache.get_fresh(self.clock.now(), flags.cache_timeout) {
            tracing::debug!("Serving {} delivery dates from cache", entry.data.len());
            return ResolvedDates {
                dates: entry.data,
                origin: DateOrigin::Cached {
                    fetched_at: entry.timestamp,
                },
            };
        }

        match self.fetch_with_retry().await {
            Ok(dates) => {
                let entry = self.cache.store(dates, self.clock.now());
                tracing::info!("Cached {} delivery dates from upstream", entry.data.len());
                ResolvedDates {
                    dates: entry.data,
                    origin: DateOrigin::Live {
                        fetched_at: entry.timestamp,
                    },
                }
            }
            Err(e) => {
                tracing::warn!("{}, falling back to generated delivery dates", e);
                self.mock()
            }
        }
    }

    /// Fetches delivery dates from upstream with bounded retries and exponential backoff.
    ///
    /// # Returns
    /// - `Ok(Vec<DeliveryDate>)` - An attempt succeeded
    /// - `Err(DeliveryDateError::RetriesExhausted)` - Every attempt failed, or zero attempts are
    ///   configured; carries the last attempt's error when there was one
    pub async fn fetch_with_retry(&self) -> Result<Vec<DeliveryDate>, DeliveryDateError> {
        let mut ctx = RetryContext::new(self.config.flags.max_retries);
        if let Some(initial_backoff) = self.initial_backoff {
            ctx = ctx.with_initial_backoff(initial_backoff);
        }

        let client = self.client;
        let result = ctx
            .execute_with_retry("delivery date fetch", || client.fetch_delivery_dates())
            .await;

        match result {
            Ok(Some(dates)) => Ok(dates),
            Ok(None) => Err(DeliveryDateError::RetriesExhausted {
                attempts: 0,
                source: None,
            }),
            Err(e) => Err(DeliveryDateError::RetriesExhausted {
                attempts: ctx.attempts(),
                source: Some(Box::new(e)),
            }),
        }
    }

    /// Generates weekday delivery dates starting tomorrow.
    pub fn generate_mock_delivery_dates(&self) -> Vec<DeliveryDate> {
        generate_mock_delivery_dates(self.clock.today(), &self.config.formatter)
    }

    /// Drops the cached upstream response so the next call fetches again.
    ///
    /// Returns whether an entry was present.
    pub fn clear_cache(&self) -> bool {
        let cleared = self.cache.clear();
        if cleared {
            tracing::info!("Delivery date cache cleared");
        }
        cleared
    }

    fn mock(&self) -> ResolvedDates {
        ResolvedDates {
            dates: self.generate_mock_delivery_dates(),
            origin: DateOrigin::Mock,
        }
    }
}
