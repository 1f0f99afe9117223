//! Batch entry point for analytics consumers.
//!
//! [`IntegrationFacade`] wires a cache, a season client and a resolver from
//! a [`ValidatorConfig`] and exposes batch and single-value validation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use statguard::config::ValidatorConfig;
//! use statguard::facade::IntegrationFacade;
//! use statguard::ingest::StatRow;
//! use statguard::record::{SourceTier, StatKey};
//! use statguard::season::NoSeasonData;
//!
//! # tokio_test_block_on(async {
//! let facade = IntegrationFacade::new(ValidatorConfig::default(), Arc::new(NoSeasonData)).unwrap();
//! let date = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
//! let rows = vec![
//!     StatRow::new(StatKey::player("1"), date, Some(0.312)),
//!     StatRow::new(StatKey::player("2"), date, None),
//! ];
//!
//! let records = facade.validate_batch(&rows).await;
//! assert_eq!(records[0].source_tier, SourceTier::Raw);
//! assert_eq!(records[1].resolved_average, 0.244);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

mod summary;

pub use summary::{BatchOutcome, BatchSummary, ValidationStats};

use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cache::{MemoryValidationCache, ValidationCache};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, ValidatorConfig};
use crate::ingest::StatRow;
use crate::profile::{validate_profile, PlayerProfile, PlayerProfileInput};
use crate::record::{is_valid_average, StatKey, StatRecord};
use crate::resolver::FallbackResolver;
use crate::season::{SeasonAggregate, SeasonAggregateClient};

/// Validation pipeline built from one configuration.
pub struct IntegrationFacade {
    resolver: FallbackResolver,
    cache: Arc<dyn ValidationCache>,
    clock: Arc<dyn Clock>,
    config: ValidatorConfig,
}

impl IntegrationFacade {
    /// Build the pipeline using the system clock.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting in `config`.
    pub fn new(
        config: ValidatorConfig,
        season: Arc<dyn SeasonAggregate>,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(config, season, Arc::new(SystemClock))
    }

    /// Build the pipeline reading time from `clock`.
    pub fn with_clock(
        config: ValidatorConfig,
        season: Arc<dyn SeasonAggregate>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let league_default = config.validate()?;

        let mut cache = MemoryValidationCache::with_clock(config.cache_ttl, clock.clone());
        if let Some(max) = config.cache_max_entries {
            cache = cache.with_max_entries(max);
        }
        let cache: Arc<dyn ValidationCache> = Arc::new(cache);

        let season = SeasonAggregateClient::new(season, config.season_timeout);
        info!(
            source = season.source_name(),
            ttl_secs = config.cache_ttl.as_secs(),
            league_default = league_default.value(),
            concurrency = config.batch_concurrency,
            "Validation pipeline ready"
        );

        let resolver =
            FallbackResolver::new(cache.clone(), season, league_default).with_clock(clock.clone());

        Ok(Self {
            resolver,
            cache,
            clock,
            config,
        })
    }

    /// The configuration the pipeline was built from.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a batch; output order equals input order.
    pub async fn validate_batch(&self, rows: &[StatRow]) -> Vec<StatRecord> {
        let records: Vec<StatRecord> = stream::iter(rows)
            .map(|row| self.resolver.resolve(&row.key, row.game_date, row.raw_average))
            .buffered(self.config.batch_concurrency)
            .collect()
            .await;

        self.log_batch(&records, false);
        records
    }

    /// Validate a batch, taking no new rows once `cancel` fires.
    ///
    /// Rows already in flight are finished, so the result is always a
    /// complete, ordered prefix of the input.
    pub async fn validate_batch_until(
        &self,
        rows: &[StatRow],
        cancel: CancellationToken,
    ) -> BatchOutcome {
        let records: Vec<StatRecord> = stream::iter(rows.iter().take_while(|_| !cancel.is_cancelled()))
            .map(|row| self.resolver.resolve(&row.key, row.game_date, row.raw_average))
            .buffered(self.config.batch_concurrency)
            .collect()
            .await;

        let cancelled = records.len() < rows.len();
        self.log_batch(&records, cancelled);

        BatchOutcome { records, cancelled }
    }

    /// Validate one value, e.g. a team-level aggregate.
    pub async fn validate_value(
        &self,
        key: &StatKey,
        game_date: NaiveDate,
        raw_average: Option<f64>,
    ) -> StatRecord {
        self.resolver.resolve(key, game_date, raw_average).await
    }

    /// Seed a known-good average for `key`, timestamped now.
    ///
    /// # Returns
    ///
    /// `false` if `average` is not a valid average and was not stored.
    pub fn remember(&self, key: &StatKey, average: f64) -> bool {
        if !is_valid_average(average) {
            return false;
        }
        self.cache.put(key, average, self.clock.now());
        true
    }

    /// Drop every cached average. Later rows cannot resolve at the
    /// previous-game tier until a value is cached again.
    pub fn clear_cache(&self) {
        let entries = self.cache.len();
        self.cache.clear();
        info!(entries, "Validation cache cleared");
    }

    /// Validate a player profile against the configured league default.
    pub fn validate_profile(&self, input: &PlayerProfileInput) -> PlayerProfile {
        validate_profile(input, self.resolver.league_default())
    }

    /// Summarize validated records.
    pub fn summarize(&self, records: &[StatRecord]) -> BatchSummary {
        BatchSummary::from_records(records)
    }

    /// Current cache and resolver statistics.
    pub fn stats(&self) -> ValidationStats {
        ValidationStats {
            cache: self.cache.stats(),
            cache_ttl: self.cache.ttl(),
            league_default: self.resolver.league_default().value(),
            resolver: self.resolver.metrics().snapshot(),
        }
    }

    fn log_batch(&self, records: &[StatRecord], cancelled: bool) {
        let fallbacks = records.iter().filter(|r| r.is_fallback()).count();
        info!(rows = records.len(), fallbacks, cancelled, "Batch validated");
    }
}
