//! Confidence grading for resolved statistics.
//!
//! The grade is a pure function of where a value came from and how old the
//! underlying data is. Downstream scoring uses it to discount weak rows.
//!
//! | Tier            | Condition   | Quality            |
//! |-----------------|-------------|--------------------|
//! | RAW             |             | HIGH               |
//! | PREVIOUS_GAME   | age < 48h   | HIGH               |
//! | PREVIOUS_GAME   | age >= 48h  | MEDIUM             |
//! | SEASON_AVERAGE  |             | MEDIUM             |
//! | LEAGUE_DEFAULT  |             | INSUFFICIENT_DATA  |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::record::SourceTier;

/// Cached values younger than this still count as high quality.
pub const PREVIOUS_GAME_FRESH_WINDOW: Duration = Duration::from_secs(48 * 60 * 60);

/// Confidence grade attached to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quality {
    /// Not enough real data; the value is a placeholder.
    InsufficientData,
    /// Partial data, only produced by profile completeness grading.
    Low,
    /// Derived or aging data.
    Medium,
    /// Observed or very recent data.
    High,
}

impl Quality {
    /// Weight applied to a value of this grade in aggregate scoring.
    pub fn confidence_weight(&self) -> f64 {
        match self {
            Quality::High => 1.0,
            Quality::Medium => 0.75,
            Quality::Low => 0.5,
            Quality::InsufficientData => 0.0,
        }
    }

    /// Stable upper-case label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Quality::High => "HIGH",
            Quality::Medium => "MEDIUM",
            Quality::Low => "LOW",
            Quality::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Grade a value by its source tier and the age of the data behind it.
///
/// `entry_age` only matters for [`SourceTier::PreviousGame`]; callers pass
/// [`Duration::ZERO`] for the other tiers.
pub fn classify(source_tier: SourceTier, entry_age: Duration) -> Quality {
    match source_tier {
        SourceTier::Raw => Quality::High,
        SourceTier::PreviousGame if entry_age < PREVIOUS_GAME_FRESH_WINDOW => Quality::High,
        SourceTier::PreviousGame => Quality::Medium,
        SourceTier::SeasonAverage => Quality::Medium,
        SourceTier::LeagueDefault => Quality::InsufficientData,
    }
}
