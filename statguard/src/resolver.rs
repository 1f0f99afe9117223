//! Tiered fallback resolution.
//!
//! ```text
//! raw value ──valid?──► RAW
//!     │ no
//!     ▼
//! validation cache ──fresh & valid?──► PREVIOUS_GAME
//!     │ no
//!     ▼
//! season aggregate (deadline) ──valid?──► SEASON_AVERAGE (+ cache write)
//!     │ no
//!     ▼
//! league default ──────────────────────► LEAGUE_DEFAULT
//! ```
//!
//! Every path ends at the league default, so resolution never fails on
//! missing data. The only side effect visible to callers is the cache write
//! after a successful season lookup.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::cache::ValidationCache;
use crate::clock::{age_between, Clock, SystemClock};
use crate::quality::classify;
use crate::record::{is_valid_average, valid_average, LeagueDefault, SourceTier, StatKey, StatRecord};
use crate::season::SeasonAggregateClient;
use crate::telemetry::ResolverMetrics;

/// A resolved value before it is graded.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Resolution {
    value: f64,
    tier: SourceTier,
    /// Age of the data behind `value`; only non-zero for cached values.
    age: Duration,
}

impl Resolution {
    fn fresh(value: f64, tier: SourceTier) -> Self {
        Self {
            value,
            tier,
            age: Duration::ZERO,
        }
    }
}

/// Decision engine producing a guaranteed-valid average per row.
pub struct FallbackResolver {
    cache: Arc<dyn ValidationCache>,
    season: SeasonAggregateClient,
    league_default: LeagueDefault,
    clock: Arc<dyn Clock>,
    metrics: Arc<ResolverMetrics>,
}

impl FallbackResolver {
    /// Create a resolver using the system clock.
    ///
    /// # Arguments
    ///
    /// * `cache` - Store of last known-good averages (tier 1, written by tier 2)
    /// * `season` - Deadline-bounded season collaborator (tier 2)
    /// * `league_default` - Value used when everything else fails (tier 3)
    pub fn new(
        cache: Arc<dyn ValidationCache>,
        season: SeasonAggregateClient,
        league_default: LeagueDefault,
    ) -> Self {
        Self {
            cache,
            season,
            league_default,
            clock: Arc::new(SystemClock),
            metrics: Arc::new(ResolverMetrics::new()),
        }
    }

    /// Read time from `clock`. Should be the same clock the cache uses.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Report into shared counters.
    pub fn with_metrics(mut self, metrics: Arc<ResolverMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The injected cache.
    pub fn cache(&self) -> &Arc<dyn ValidationCache> {
        &self.cache
    }

    /// The configured league default.
    pub fn league_default(&self) -> LeagueDefault {
        self.league_default
    }

    /// Resolver counters.
    pub fn metrics(&self) -> &Arc<ResolverMetrics> {
        &self.metrics
    }

    /// Resolve one raw value into a validated record.
    ///
    /// # Arguments
    ///
    /// * `key` - Identity the value belongs to
    /// * `game_date` - Game the value was reported for; also the season as-of date
    /// * `raw_average` - Untrusted feed value, `None` when missing
    pub async fn resolve(
        &self,
        key: &StatKey,
        game_date: NaiveDate,
        raw_average: Option<f64>,
    ) -> StatRecord {
        let resolution = self.resolve_value(key, game_date, raw_average).await;
        self.metrics.record_tier(resolution.tier);

        StatRecord {
            key: key.clone(),
            game_date,
            raw_average,
            resolved_average: resolution.value,
            quality: classify(resolution.tier, resolution.age),
            source_tier: resolution.tier,
        }
    }

    async fn resolve_value(
        &self,
        key: &StatKey,
        game_date: NaiveDate,
        raw_average: Option<f64>,
    ) -> Resolution {
        if let Some(value) = valid_average(raw_average) {
            return Resolution::fresh(value, SourceTier::Raw);
        }

        debug!(key = %key, %game_date, raw = ?raw_average, "Raw average invalid, applying fallback");

        if let Some(resolution) = self.from_cache(key) {
            return resolution;
        }

        if let Some(resolution) = self.from_season(key, game_date).await {
            return resolution;
        }

        warn!(
            key = %key,
            %game_date,
            league_default = self.league_default.value(),
            "Applied league average fallback"
        );
        Resolution::fresh(self.league_default.value(), SourceTier::LeagueDefault)
    }

    fn from_cache(&self, key: &StatKey) -> Option<Resolution> {
        let entry = self.cache.get(key)?;

        if !is_valid_average(entry.average) {
            warn!(key = %key, average = entry.average, "Dropping invalid cached average");
            self.cache.remove(key);
            return None;
        }

        let age = age_between(entry.computed_at, self.clock.now());
        debug!(key = %key, average = entry.average, age_secs = age.as_secs(), "Applied previous game fallback");

        Some(Resolution {
            value: entry.average,
            tier: SourceTier::PreviousGame,
            age,
        })
    }

    async fn from_season(&self, key: &StatKey, game_date: NaiveDate) -> Option<Resolution> {
        let lookup = self.season.lookup(key, game_date).await;
        self.metrics.record_season_lookup(&lookup);

        let value = lookup.value()?;
        if !is_valid_average(value) {
            self.metrics.record_season_invalid();
            warn!(key = %key, %game_date, average = value, "Season average out of range, ignoring");
            return None;
        }

        self.cache.put(key, value, self.clock.now());
        debug!(key = %key, %game_date, average = value, "Applied season average fallback");

        Some(Resolution::fresh(value, SourceTier::SeasonAverage))
    }
}
