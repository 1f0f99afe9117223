//! Core trait for the validation cache.
//!
//! The cache maps a [`StatKey`] to its last known-good average. Entries carry
//! the time they were computed; a read only counts as a hit while the entry
//! is younger than the cache TTL.
//!
//! # Design Principles
//!
//! - **Injected, never global**: resolvers hold an `Arc<dyn ValidationCache>`
//! - **Lazy expiry**: stale entries are dropped when they are read
//! - **Last writer wins**: every write recomputes the same logical quantity
//!   from the same upstream source, so overwrites are harmless
//! - **Dyn-compatible**: plain synchronous methods, usable behind `Arc`

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::record::StatKey;

/// A known-good average held by the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Identity the average belongs to.
    pub key: StatKey,
    /// The cached average.
    pub average: f64,
    /// When the average was computed.
    pub computed_at: DateTime<Utc>,
    /// Freshness window the entry was read under.
    pub ttl: Duration,
}

/// Counters describing cache activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads that returned a fresh entry.
    pub hits: u64,
    /// Reads that returned nothing (including expired entries).
    pub misses: u64,
    /// Entries dropped because they outlived the TTL.
    pub expirations: u64,
    /// Entries dropped to stay under the capacity bound.
    pub evictions: u64,
    /// Entries currently stored, fresh or not.
    pub entry_count: usize,
}

impl CacheStats {
    /// Fraction of reads that were hits, or 0 when nothing was read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cache: {} entries, {} hits, {} misses, {} expired, {} evicted",
            self.entry_count, self.hits, self.misses, self.expirations, self.evictions
        )
    }
}

/// Keyed store of last known-good averages.
///
/// # Thread Safety
///
/// Implementations must tolerate simultaneous readers and writers from many
/// async tasks.
pub trait ValidationCache: Send + Sync {
    /// Look up a fresh entry.
    ///
    /// # Returns
    ///
    /// - `Some(entry)` if the key is present and `now - computed_at < ttl`
    /// - `None` if the key is absent or stale (stale entries may be removed)
    fn get(&self, key: &StatKey) -> Option<CacheEntry>;

    /// Store an average computed at `timestamp`, replacing any previous one.
    fn put(&self, key: &StatKey, average: f64, timestamp: DateTime<Utc>);

    /// Remove an entry.
    ///
    /// # Returns
    ///
    /// `true` if the key existed.
    fn remove(&self, key: &StatKey) -> bool;

    /// Remove every entry.
    fn clear(&self);

    /// Number of stored entries, fresh or not.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The freshness window applied to reads.
    fn ttl(&self) -> Duration;

    /// Activity counters.
    fn stats(&self) -> CacheStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cache_stats_display() {
        let stats = CacheStats {
            hits: 10,
            misses: 4,
            expirations: 2,
            evictions: 1,
            entry_count: 7,
        };
        let display = stats.to_string();
        assert!(display.contains("7 entries"));
        assert!(display.contains("10 hits"));
        assert!(display.contains("2 expired"));
    }
}
