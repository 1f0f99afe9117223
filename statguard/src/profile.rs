//! Player profile validation.
//!
//! Fills defaults for missing profile fields and grades how much of the
//! profile is real data rather than filler.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::quality::Quality;
use crate::record::{is_valid_average, LeagueDefault};

pub const UNKNOWN_PLAYER: &str = "Unknown Player";
pub const UNKNOWN_POSITION: &str = "Unknown";
pub const FREE_AGENT: &str = "Free Agent";

/// Number of fields that count towards completeness.
const GRADED_FIELDS: usize = 5;

/// Profile as supplied by the feed; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlayerProfileInput {
    pub player_id: Option<String>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub batting_avg: Option<f64>,
}

/// Profile with every display field populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub player_id: Option<String>,
    pub name: String,
    pub position: String,
    pub team: String,
    pub batting_avg: f64,
    pub data_quality: Quality,
}

/// Validate a profile, substituting defaults where data is missing.
///
/// The batting average is replaced by the league default when missing or
/// outside `[0, 1]`. Blank strings count as missing.
pub fn validate_profile(input: &PlayerProfileInput, league_default: LeagueDefault) -> PlayerProfile {
    let player_id = present(&input.player_id);
    let name = present(&input.name);
    let position = present(&input.position);
    let team = present(&input.team);

    let batting_avg = match input.batting_avg {
        Some(avg) if is_valid_average(avg) => Some(avg),
        Some(avg) => {
            warn!(
                player_id = ?player_id,
                batting_avg = avg,
                league_default = league_default.value(),
                "Invalid batting average, using league average"
            );
            None
        }
        None => None,
    };

    let real_fields = [
        player_id.is_some(),
        name.is_some_and(|n| n != UNKNOWN_PLAYER),
        position.is_some_and(|p| p != UNKNOWN_POSITION),
        team.is_some_and(|t| t != FREE_AGENT),
        batting_avg.is_some(),
    ]
    .iter()
    .filter(|real| **real)
    .count();

    let profile = PlayerProfile {
        player_id: player_id.map(str::to_string),
        name: name.unwrap_or(UNKNOWN_PLAYER).to_string(),
        position: position.unwrap_or(UNKNOWN_POSITION).to_string(),
        team: team.unwrap_or(FREE_AGENT).to_string(),
        batting_avg: batting_avg.unwrap_or(league_default.value()),
        data_quality: grade_completeness(real_fields as f64 / GRADED_FIELDS as f64),
    };

    if real_fields < GRADED_FIELDS {
        info!(
            player_id = ?profile.player_id,
            real_fields,
            quality = %profile.data_quality,
            "Applied profile defaults"
        );
    }

    profile
}

/// Grade the fraction of fields carrying real data.
pub fn grade_completeness(fraction: f64) -> Quality {
    if fraction >= 0.8 {
        Quality::High
    } else if fraction >= 0.6 {
        Quality::Medium
    } else if fraction >= 0.4 {
        Quality::Low
    } else {
        Quality::InsufficientData
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
