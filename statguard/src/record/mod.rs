//! Validated statistic records and the value domain they live in.
//!
//! A [`StatRecord`] is built once per validation call and never persisted.
//! Its `resolved_average` is always inside `[0, 1]`; the `source_tier`
//! records which step of the fallback chain produced it.

mod key;

pub use key::{StatKey, PLAYER_NAMESPACE, TEAM_NAMESPACE};

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::quality::Quality;

/// 2024 MLB league batting average, used when nothing better is known.
pub const DEFAULT_LEAGUE_AVERAGE: f64 = 0.244;

/// Returns `true` if `value` is a usable batting average.
///
/// A value is usable when it is finite and inside the closed interval
/// `[0, 1]`. Zero is valid: a hitless game is a legitimate observation.
pub fn is_valid_average(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Returns the raw value only if it is a usable batting average.
pub fn valid_average(raw: Option<f64>) -> Option<f64> {
    raw.filter(|v| is_valid_average(*v))
}

/// Which step of the fallback chain produced a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceTier {
    /// The raw feed value was valid and used as-is.
    Raw,
    /// Last known-good value from the validation cache.
    PreviousGame,
    /// Season aggregate from the season-aggregate collaborator.
    SeasonAverage,
    /// Configured league-wide constant.
    LeagueDefault,
}

impl SourceTier {
    /// All tiers, in fallback order.
    pub const ALL: [SourceTier; 4] = [
        SourceTier::Raw,
        SourceTier::PreviousGame,
        SourceTier::SeasonAverage,
        SourceTier::LeagueDefault,
    ];

    /// Stable upper-case label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            SourceTier::Raw => "RAW",
            SourceTier::PreviousGame => "PREVIOUS_GAME",
            SourceTier::SeasonAverage => "SEASON_AVERAGE",
            SourceTier::LeagueDefault => "LEAGUE_DEFAULT",
        }
    }

    /// Parse a tier label, case-insensitively. Accepts `-` for `_`.
    pub fn from_label(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL.into_iter().find(|t| t.label() == normalized)
    }
}

impl fmt::Display for SourceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// League-wide fallback average.
///
/// Constructed only through [`LeagueDefault::new`], so holding one means the
/// value is already known to be a valid average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeagueDefault(f64);

impl LeagueDefault {
    /// Validate and wrap a league default.
    pub fn new(value: f64) -> Result<Self, ConfigError> {
        if is_valid_average(value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidLeagueDefault(value.to_string()))
        }
    }

    /// The wrapped average.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for LeagueDefault {
    fn default() -> Self {
        Self(DEFAULT_LEAGUE_AVERAGE)
    }
}

/// A validated statistic with its provenance and confidence grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Identity the statistic belongs to.
    pub key: StatKey,
    /// Game the raw value was reported for.
    pub game_date: NaiveDate,
    /// Raw value as received from the feed, if any.
    pub raw_average: Option<f64>,
    /// Validated value, always inside `[0, 1]`.
    pub resolved_average: f64,
    /// Confidence grade for downstream weighting.
    pub quality: Quality,
    /// Fallback tier that produced `resolved_average`.
    pub source_tier: SourceTier,
}

impl StatRecord {
    /// Whether the raw value had to be replaced.
    pub fn is_fallback(&self) -> bool {
        self.source_tier != SourceTier::Raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_bounds() {
        assert!(is_valid_average(0.0));
        assert!(is_valid_average(1.0));
        assert!(is_valid_average(0.305));
        assert!(!is_valid_average(-0.5));
        assert!(!is_valid_average(1.5));
        assert!(!is_valid_average(f64::NAN));
        assert!(!is_valid_average(f64::INFINITY));
    }

    #[test]
    fn test_valid_average_filters_missing_and_out_of_range() {
        assert_eq!(valid_average(None), None);
        assert_eq!(valid_average(Some(1.0001)), None);
        assert_eq!(valid_average(Some(0.0)), Some(0.0));
    }

    #[test]
    fn test_league_default_rejects_out_of_range() {
        assert!(LeagueDefault::new(0.244).is_ok());
        assert!(matches!(
            LeagueDefault::new(2.44),
            Err(ConfigError::InvalidLeagueDefault(_))
        ));
        assert!(LeagueDefault::new(f64::NAN).is_err());
    }

    #[test]
    fn test_league_default_default_value() {
        assert_eq!(LeagueDefault::default().value(), 0.244);
    }

    #[test]
    fn test_tier_labels_round_trip() {
        for tier in SourceTier::ALL {
            assert_eq!(SourceTier::from_label(tier.label()), Some(tier));
        }
        assert_eq!(
            SourceTier::from_label("previous-game"),
            Some(SourceTier::PreviousGame)
        );
        assert_eq!(SourceTier::from_label("bogus"), None);
    }

    #[test]
    fn test_tier_serialization_matches_label() {
        let json = serde_json::to_string(&SourceTier::SeasonAverage).unwrap();
        assert_eq!(json, "\"SEASON_AVERAGE\"");
    }
}
