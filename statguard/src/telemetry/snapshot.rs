//! Point-in-time copy of resolver counters.

use std::fmt;

use serde::Serialize;

use crate::record::SourceTier;

/// Resolver counters at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolverSnapshot {
    /// Rows whose raw value was used.
    pub raw: u64,
    /// Rows served from the validation cache.
    pub previous_game: u64,
    /// Rows served from the season collaborator.
    pub season_average: u64,
    /// Rows that fell through to the league default.
    pub league_default: u64,
    /// Season queries that hit their deadline.
    pub season_timeouts: u64,
    /// Season queries that reported an error.
    pub season_errors: u64,
    /// Season values rejected as out of range.
    pub season_invalid: u64,
}

impl ResolverSnapshot {
    /// Rows resolved in total.
    pub fn total(&self) -> u64 {
        self.raw + self.previous_game + self.season_average + self.league_default
    }

    /// Rows served by `tier`.
    pub fn count(&self, tier: SourceTier) -> u64 {
        match tier {
            SourceTier::Raw => self.raw,
            SourceTier::PreviousGame => self.previous_game,
            SourceTier::SeasonAverage => self.season_average,
            SourceTier::LeagueDefault => self.league_default,
        }
    }

    /// Fraction of rows whose raw value had to be replaced.
    pub fn fallback_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (total - self.raw) as f64 / total as f64
        }
    }
}

impl fmt::Display for ResolverSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resolved {} rows: {} raw, {} previous game, {} season, {} league default \
             ({} season timeouts, {} season errors)",
            self.total(),
            self.raw,
            self.previous_game,
            self.season_average,
            self.league_default,
            self.season_timeouts,
            self.season_errors
        )
    }
}
