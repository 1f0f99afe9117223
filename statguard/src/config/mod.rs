//! Validator configuration.
//!
//! [`ValidatorConfig`] carries every tunable of the fallback chain. It is
//! checked once by [`ValidatorConfig::validate`] so that setup mistakes fail
//! fast, before a single row is resolved.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use statguard::config::ValidatorConfig;
//!
//! let config = ValidatorConfig::default()
//!     .with_cache_ttl(Duration::from_secs(6 * 3600))
//!     .with_league_default(0.248)
//!     .with_batch_concurrency(8);
//! assert!(config.validate().is_ok());
//! ```

mod error;
mod file;

pub use error::ConfigError;
pub use file::{config_file_path, ConfigFile, LoggingSettings, SeasonSettings};

use std::time::Duration;

use crate::record::{LeagueDefault, DEFAULT_LEAGUE_AVERAGE};

/// Default cache TTL (24 hours).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default deadline for a season-aggregate query.
pub const DEFAULT_SEASON_TIMEOUT: Duration = Duration::from_secs(2);

/// Default number of rows resolved concurrently within a batch.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 16;

/// Configuration for the validation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Maximum age at which a cached average is still used.
    pub cache_ttl: Duration,

    /// Optional bound on the number of cached identities.
    pub cache_max_entries: Option<usize>,

    /// Average used when every other tier fails.
    pub league_default: f64,

    /// Deadline for one season-aggregate query.
    pub season_timeout: Duration,

    /// Rows resolved concurrently within a batch.
    pub batch_concurrency: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: None,
            league_default: DEFAULT_LEAGUE_AVERAGE,
            season_timeout: DEFAULT_SEASON_TIMEOUT,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl ValidatorConfig {
    /// Set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Bound the cache to `max` identities.
    pub fn with_cache_max_entries(mut self, max: usize) -> Self {
        self.cache_max_entries = Some(max);
        self
    }

    /// Set the league default average.
    pub fn with_league_default(mut self, value: f64) -> Self {
        self.league_default = value;
        self
    }

    /// Set the season query deadline.
    pub fn with_season_timeout(mut self, timeout: Duration) -> Self {
        self.season_timeout = timeout;
        self
    }

    /// Set the batch concurrency.
    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency;
        self
    }

    /// Check every setting.
    ///
    /// # Returns
    ///
    /// The validated league default, so callers don't re-check it.
    pub fn validate(&self) -> Result<LeagueDefault, ConfigError> {
        // The config file stores whole seconds.
        if self.cache_ttl.as_secs() == 0 || self.cache_ttl.subsec_nanos() != 0 {
            return Err(ConfigError::InvalidTtl(format!("{:?}", self.cache_ttl)));
        }
        if self.season_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(format!(
                "{:?}",
                self.season_timeout
            )));
        }
        if self.batch_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(
                self.batch_concurrency.to_string(),
            ));
        }
        if self.cache_max_entries == Some(0) {
            return Err(ConfigError::InvalidCapacity("0".to_string()));
        }
        LeagueDefault::new(self.league_default)
    }
}
