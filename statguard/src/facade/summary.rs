//! Batch summaries and facade statistics.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::cache::CacheStats;
use crate::quality::Quality;
use crate::record::{SourceTier, StatRecord};
use crate::telemetry::ResolverSnapshot;

/// Result of a batch that may have been cancelled.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Records for the leading rows that completed, in input order.
    pub records: Vec<StatRecord>,
    /// Whether cancellation cut the batch short.
    pub cancelled: bool,
}

/// Aggregate view over a batch of validated records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,

    pub raw: usize,
    pub previous_game: usize,
    pub season_average: usize,
    pub league_default: usize,

    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub insufficient_data: usize,

    /// Mean of resolved averages weighted by confidence; `None` when every
    /// record has zero weight.
    pub weighted_average: Option<f64>,
}

impl BatchSummary {
    /// Summarize `records`.
    pub fn from_records(records: &[StatRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for record in records {
            match record.source_tier {
                SourceTier::Raw => summary.raw += 1,
                SourceTier::PreviousGame => summary.previous_game += 1,
                SourceTier::SeasonAverage => summary.season_average += 1,
                SourceTier::LeagueDefault => summary.league_default += 1,
            }
            match record.quality {
                Quality::High => summary.high += 1,
                Quality::Medium => summary.medium += 1,
                Quality::Low => summary.low += 1,
                Quality::InsufficientData => summary.insufficient_data += 1,
            }

            let weight = record.quality.confidence_weight();
            weighted_sum += weight * record.resolved_average;
            weight_total += weight;
        }

        if weight_total > 0.0 {
            summary.weighted_average = Some(weighted_sum / weight_total);
        }

        summary
    }

    /// Count of records produced by `tier`.
    pub fn tier_count(&self, tier: SourceTier) -> usize {
        match tier {
            SourceTier::Raw => self.raw,
            SourceTier::PreviousGame => self.previous_game,
            SourceTier::SeasonAverage => self.season_average,
            SourceTier::LeagueDefault => self.league_default,
        }
    }

    /// Records that needed a fallback.
    pub fn fallbacks(&self) -> usize {
        self.total - self.raw
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} records, {} fallbacks", self.total, self.fallbacks())?;
        for tier in SourceTier::ALL {
            writeln!(f, "  {:<16} {}", tier.label(), self.tier_count(tier))?;
        }
        write!(
            f,
            "  quality: {} high, {} medium, {} low, {} insufficient",
            self.high, self.medium, self.low, self.insufficient_data
        )?;
        if let Some(avg) = self.weighted_average {
            write!(f, "\n  weighted average: {:.3}", avg)?;
        }
        Ok(())
    }
}

/// Point-in-time view of the facade's state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationStats {
    pub cache: CacheStats,
    pub cache_ttl: Duration,
    pub league_default: f64,
    pub resolver: ResolverSnapshot,
}

impl fmt::Display for ValidationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (ttl {}s)", self.cache, self.cache_ttl.as_secs())?;
        writeln!(f, "league default: {:.3}", self.league_default)?;
        write!(f, "{}", self.resolver)
    }
}
