//! In-memory validation cache backed by `dashmap`.
//!
//! `DashMap` shards its map behind per-shard locks, so concurrent rows of a
//! batch can read and refresh different players without contending on a
//! single mutex. Expiry is lazy: a stale entry is removed by the read that
//! discovers it, or by [`MemoryValidationCache::purge_expired`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::cache::traits::{CacheEntry, CacheStats, ValidationCache};
use crate::clock::{age_between, Clock, SystemClock};
use crate::record::StatKey;

#[derive(Debug, Clone, Copy)]
struct StoredAverage {
    average: f64,
    computed_at: DateTime<Utc>,
}

/// TTL-bound in-memory cache of known-good averages.
pub struct MemoryValidationCache {
    /// Stored averages keyed by identity.
    entries: DashMap<StatKey, StoredAverage>,

    /// Freshness window for reads.
    ttl: Duration,

    /// Optional soft bound on the number of entries.
    max_entries: Option<usize>,

    /// Time source for freshness checks.
    clock: Arc<dyn Clock>,

    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl MemoryValidationCache {
    /// Create an unbounded cache using the system clock.
    ///
    /// # Arguments
    ///
    /// * `ttl` - Maximum age at which an entry is still served
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create an unbounded cache reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries: None,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Bound the number of stored entries.
    ///
    /// When a new key would exceed the bound, expired entries are purged
    /// first, then the entry with the oldest `computed_at` is evicted.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// The configured capacity bound, if any.
    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    /// Drop every entry that has outlived the TTL.
    ///
    /// # Returns
    ///
    /// Number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, stored| self.is_fresh(stored, now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            self.expirations
                .fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, "Purged expired validation cache entries");
        }
        removed
    }

    fn is_fresh(&self, stored: &StoredAverage, now: DateTime<Utc>) -> bool {
        age_between(stored.computed_at, now) < self.ttl
    }

    fn make_room(&self, max_entries: usize) {
        if self.entries.len() < max_entries {
            return;
        }

        self.purge_expired();

        while self.entries.len() >= max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.value().computed_at)
                .map(|e| e.key().clone());

            match oldest {
                Some(key) => {
                    if self.entries.remove(&key).is_some() {
                        self.evictions.fetch_add(1, Ordering::Relaxed);
                        debug!(key = %key, "Evicted oldest validation cache entry");
                    }
                }
                None => break,
            }
        }
    }
}

impl ValidationCache for MemoryValidationCache {
    fn get(&self, key: &StatKey) -> Option<CacheEntry> {
        let now = self.clock.now();
        // Copy out of the shard guard before any removal to avoid deadlock.
        let stored = self.entries.get(key).map(|e| *e.value());

        match stored {
            Some(stored) if self.is_fresh(&stored, now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(CacheEntry {
                    key: key.clone(),
                    average: stored.average,
                    computed_at: stored.computed_at,
                    ttl: self.ttl,
                })
            }
            Some(stored) => {
                // Only drop the entry we judged stale, not a concurrent refresh.
                let removed = self
                    .entries
                    .remove_if(key, |_, current| current.computed_at == stored.computed_at)
                    .is_some();
                if removed {
                    self.expirations.fetch_add(1, Ordering::Relaxed);
                }
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, computed_at = %stored.computed_at, "Validation cache entry expired");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn put(&self, key: &StatKey, average: f64, timestamp: DateTime<Utc>) {
        if let Some(max) = self.max_entries {
            if !self.entries.contains_key(key) {
                self.make_room(max);
            }
        }

        self.entries.insert(
            key.clone(),
            StoredAverage {
                average,
                computed_at: timestamp,
            },
        );
    }

    fn remove(&self, key: &StatKey) -> bool {
        self.entries.remove(key).is_some()
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entry_count: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const HOUR: Duration = Duration::from_secs(3600);

    fn cache_with_clock(ttl: Duration) -> (MemoryValidationCache, Arc<ManualClock>) {
        let clock = ManualClock::shared_now();
        let cache = MemoryValidationCache::with_clock(ttl, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_put_and_get() {
        let (cache, clock) = cache_with_clock(HOUR * 24);
        let key = StatKey::player("1");

        cache.put(&key, 0.280, clock.now());

        let entry = cache.get(&key).expect("entry should be fresh");
        assert_eq!(entry.average, 0.280);
        assert_eq!(entry.key, key);
        assert_eq!(entry.ttl, HOUR * 24);
    }

    #[test]
    fn test_get_missing() {
        let (cache, _clock) = cache_with_clock(HOUR);
        assert!(cache.get(&StatKey::player("nobody")).is_none());
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let (cache, clock) = cache_with_clock(HOUR);
        let key = StatKey::player("1");
        cache.put(&key, 0.300, clock.now());

        clock.advance(HOUR - Duration::from_secs(1));
        assert!(cache.get(&key).is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get(&key).is_none(), "age == ttl is a miss");
        assert_eq!(cache.len(), 0, "stale entry is evicted lazily");
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_put_with_old_timestamp_is_already_stale() {
        let (cache, clock) = cache_with_clock(HOUR * 24);
        let key = StatKey::player("1");
        let stamped = clock.now() - chrono::Duration::hours(25);

        cache.put(&key, 0.300, stamped);

        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_last_writer_wins() {
        let (cache, clock) = cache_with_clock(HOUR);
        let key = StatKey::player("1");

        cache.put(&key, 0.250, clock.now());
        cache.put(&key, 0.275, clock.now());

        assert_eq!(cache.get(&key).map(|e| e.average), Some(0.275));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let (cache, clock) = cache_with_clock(HOUR);
        cache.put(&StatKey::player("1"), 0.2, clock.now());
        cache.put(&StatKey::player("2"), 0.3, clock.now());

        assert!(cache.remove(&StatKey::player("1")));
        assert!(!cache.remove(&StatKey::player("1")));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let (cache, clock) = cache_with_clock(HOUR);
        cache.put(&StatKey::player("old"), 0.2, clock.now());
        clock.advance(HOUR / 2);
        cache.put(&StatKey::player("new"), 0.3, clock.now());
        clock.advance(HOUR / 2);

        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.get(&StatKey::player("new")).is_some());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let (cache, clock) = cache_with_clock(HOUR * 24);
        let cache = cache.with_max_entries(2);

        cache.put(&StatKey::player("a"), 0.1, clock.now());
        clock.advance(Duration::from_secs(60));
        cache.put(&StatKey::player("b"), 0.2, clock.now());
        clock.advance(Duration::from_secs(60));
        cache.put(&StatKey::player("c"), 0.3, clock.now());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&StatKey::player("a")).is_none());
        assert!(cache.get(&StatKey::player("c")).is_some());
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_capacity_prefers_expired_entries() {
        let (cache, clock) = cache_with_clock(HOUR);
        let cache = cache.with_max_entries(2);

        cache.put(&StatKey::player("stale"), 0.1, clock.now());
        clock.advance(HOUR * 2);
        cache.put(&StatKey::player("fresh"), 0.2, clock.now());
        cache.put(&StatKey::player("newest"), 0.3, clock.now());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_overwrite_does_not_evict_at_capacity() {
        let (cache, clock) = cache_with_clock(HOUR);
        let cache = cache.with_max_entries(1);

        cache.put(&StatKey::player("a"), 0.1, clock.now());
        cache.put(&StatKey::player("a"), 0.2, clock.now());

        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get(&StatKey::player("a")).map(|e| e.average), Some(0.2));
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let cache = Arc::new(MemoryValidationCache::new(HOUR));
        let mut handles = Vec::new();

        for i in 0..50 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                let key = StatKey::player(format!("{}", i));
                let average = i as f64 / 100.0;
                cache.put(&key, average, Utc::now());
                let entry = cache.get(&key).expect("fresh entry");
                assert_eq!(entry.average, average);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len(), 50);
        assert_eq!(cache.stats().hits, 50);
    }
}
