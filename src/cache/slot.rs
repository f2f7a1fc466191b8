//! Single-slot balance cache.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::time::Instant;

use crate::observability::metrics;
use crate::provider::types::BalanceReading;

/// A cached reading and the instant it stops being fresh.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    reading: BalanceReading,
    expires_at: Instant,
}

impl CacheEntry {
    pub fn new(reading: BalanceReading, ttl: Duration) -> Self {
        Self {
            reading,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn reading(&self) -> &BalanceReading {
        &self.reading
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Fresh while `now` is strictly before expiry.
    pub fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Lock-free holder for the most recent balance reading.
#[derive(Debug, Default)]
pub struct BalanceCache {
    slot: ArcSwapOption<CacheEntry>,
}

impl BalanceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached reading, if it is still fresh.
    pub fn get(&self) -> Option<BalanceReading> {
        match self.slot.load_full() {
            Some(entry) if entry.is_fresh(Instant::now()) => {
                metrics::record_cache_lookup("hit");
                Some(entry.reading.clone())
            }
            Some(_) => {
                metrics::record_cache_lookup("expired");
                None
            }
            None => {
                metrics::record_cache_lookup("miss");
                None
            }
        }
    }

    /// The last stored reading regardless of expiry.
    pub fn get_stale(&self) -> Option<BalanceReading> {
        self.slot
            .load_full()
            .map(|entry| entry.reading.clone())
    }

    /// Replace the slot with a new entry valid for `ttl`.
    pub fn put(&self, reading: BalanceReading, ttl: Duration) {
        let entry = Arc::new(CacheEntry::new(reading, ttl));
        self.slot.store(Some(entry));
    }

    /// Drop the cached entry, fresh or stale.
    pub fn clear(&self) {
        self.slot.store(None);
    }
}
