//! Atomic counters for the fallback chain.

use std::sync::atomic::{AtomicU64, Ordering};

use super::snapshot::ResolverSnapshot;
use crate::record::SourceTier;
use crate::season::SeasonLookup;

/// Counters updated by the resolver on every row.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    raw: AtomicU64,
    previous_game: AtomicU64,
    season_average: AtomicU64,
    league_default: AtomicU64,
    season_timeouts: AtomicU64,
    season_errors: AtomicU64,
    season_invalid: AtomicU64,
}

impl ResolverMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a row served by `tier`.
    pub fn record_tier(&self, tier: SourceTier) {
        let counter = match tier {
            SourceTier::Raw => &self.raw,
            SourceTier::PreviousGame => &self.previous_game,
            SourceTier::SeasonAverage => &self.season_average,
            SourceTier::LeagueDefault => &self.league_default,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count the failure modes of a season lookup.
    pub fn record_season_lookup(&self, lookup: &SeasonLookup) {
        match lookup {
            SeasonLookup::TimedOut => {
                self.season_timeouts.fetch_add(1, Ordering::Relaxed);
            }
            SeasonLookup::Failed(_) => {
                self.season_errors.fetch_add(1, Ordering::Relaxed);
            }
            SeasonLookup::Found(_) | SeasonLookup::Empty => {}
        }
    }

    /// Count a season value rejected as out of range.
    pub fn record_season_invalid(&self) {
        self.season_invalid.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter.
    pub fn snapshot(&self) -> ResolverSnapshot {
        ResolverSnapshot {
            raw: self.raw.load(Ordering::Relaxed),
            previous_game: self.previous_game.load(Ordering::Relaxed),
            season_average: self.season_average.load(Ordering::Relaxed),
            league_default: self.league_default.load(Ordering::Relaxed),
            season_timeouts: self.season_timeouts.load(Ordering::Relaxed),
            season_errors: self.season_errors.load(Ordering::Relaxed),
            season_invalid: self.season_invalid.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::SeasonQueryError;

    #[test]
    fn test_record_each_tier() {
        let metrics = ResolverMetrics::new();
        for tier in SourceTier::ALL {
            metrics.record_tier(tier);
        }
        metrics.record_tier(SourceTier::Raw);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.raw, 2);
        assert_eq!(snapshot.previous_game, 1);
        assert_eq!(snapshot.season_average, 1);
        assert_eq!(snapshot.league_default, 1);
    }

    #[test]
    fn test_record_season_failures() {
        let metrics = ResolverMetrics::new();
        metrics.record_season_lookup(&SeasonLookup::TimedOut);
        metrics.record_season_lookup(&SeasonLookup::Failed(SeasonQueryError::Decode(
            "bad".into(),
        )));
        metrics.record_season_lookup(&SeasonLookup::Empty);
        metrics.record_season_lookup(&SeasonLookup::Found(0.3));
        metrics.record_season_invalid();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.season_timeouts, 1);
        assert_eq!(snapshot.season_errors, 1);
        assert_eq!(snapshot.season_invalid, 1);
    }
}
