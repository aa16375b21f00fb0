//! Single-slot in-memory cache for upstream delivery dates.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::delivery_date::DeliveryDate;

/// A successful upstream fetch and the instant it completed.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub data: Vec<DeliveryDate>,
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry may still be served at `now` given a time-to-live of `ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        now - self.timestamp < ttl
    }
}

/// Process-wide cache holding at most one [`CacheEntry`].
///
/// Clones share the same slot. The lock is only held for the read or write itself, never
/// across an upstream call, so concurrent misses each fetch and the last store wins.
#[derive(Debug, Clone, Default)]
pub struct DeliveryDateCache {
    entry: Arc<Mutex<Option<CacheEntry>>>,
}

impl DeliveryDateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached entry if it is still fresh at `now`.
    pub fn get_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> Option<CacheEntry> {
        self.lock()
            .as_ref()
            .filter(|entry| entry.is_fresh(now, ttl))
            .cloned()
    }

    /// Returns the cached entry regardless of age.
    pub fn peek(&self) -> Option<CacheEntry> {
        self.lock().clone()
    }

    /// Replaces the cached entry.
    pub fn store(&self, data: Vec<DeliveryDate>, timestamp: DateTime<Utc>) -> CacheEntry {
        let entry = CacheEntry { data, timestamp };
        *self.lock() = Some(entry.clone());
        entry
    }

    /// Drops the cached entry. Returns whether there was one.
    pub fn clear(&self) -> bool {
        self.lock().take().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        // Entries are replaced whole, a poisoned lock can't hold a half-written value
        self.entry.lock().unwrap_or_else(|e| e.into_inner())
    }
}
