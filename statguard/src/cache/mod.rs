//! Validation cache: last known-good averages with a freshness window.
//!
//! The resolver reads this cache for its first fallback tier and writes to it
//! whenever a season aggregate resolves successfully.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use chrono::Utc;
//! use statguard::cache::{MemoryValidationCache, ValidationCache};
//! use statguard::record::StatKey;
//!
//! let cache = MemoryValidationCache::new(Duration::from_secs(24 * 3600));
//! let key = StatKey::player("545361");
//! cache.put(&key, 0.280, Utc::now());
//! assert_eq!(cache.get(&key).map(|e| e.average), Some(0.280));
//! ```

mod memory;
mod traits;

pub use memory::MemoryValidationCache;
pub use traits::{CacheEntry, CacheStats, ValidationCache};
