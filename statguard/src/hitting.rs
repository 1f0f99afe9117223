//! Batting average arithmetic.
//!
//! Season tables may express a player's line as a ready-made average, as
//! hit/at-bat counts, or as a Statcast-style list of plate-appearance
//! events. These helpers turn the latter two into an average.

/// Statcast event names that count as hits.
pub const HIT_EVENTS: [&str; 4] = ["single", "double", "triple", "home_run"];

/// Whether a Statcast event name is a hit.
pub fn is_hit_event(event: &str) -> bool {
    let event = event.trim();
    HIT_EVENTS.iter().any(|h| h.eq_ignore_ascii_case(event))
}

/// `hits / at_bats`, or `None` when there were no at-bats.
pub fn average_from_counts(hits: u32, at_bats: u32) -> Option<f64> {
    if at_bats == 0 {
        None
    } else {
        Some(f64::from(hits) / f64::from(at_bats))
    }
}

/// Average over a list of events, each counted as one at-bat.
///
/// Returns `None` for an empty list.
pub fn average_from_events<I, S>(events: I) -> Option<f64>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (hits, at_bats) = events.into_iter().fold((0u32, 0u32), |(h, ab), e| {
        let hit = u32::from(is_hit_event(e.as_ref()));
        (h + hit, ab + 1)
    });
    average_from_counts(hits, at_bats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_from_counts() {
        assert!((average_from_counts(85, 300).unwrap() - 85.0 / 300.0).abs() < 1e-12);
        assert_eq!(average_from_counts(0, 4), Some(0.0));
        assert_eq!(average_from_counts(3, 0), None);
    }

    #[test]
    fn test_average_from_events() {
        let events = ["single", "home_run", "strikeout", "double", "single"];
        assert_eq!(average_from_events(events), Some(0.8));
    }

    #[test]
    fn test_average_from_events_counts_walks_as_at_bats() {
        let events = ["walk", "single", "strikeout", "field_out"];
        assert_eq!(average_from_events(events), Some(0.25));
    }

    #[test]
    fn test_average_from_no_events() {
        assert_eq!(average_from_events(Vec::<String>::new()), None);
    }

    #[test]
    fn test_hit_event_matching_is_lenient() {
        assert!(is_hit_event("Home_Run"));
        assert!(is_hit_event(" triple "));
        assert!(!is_hit_event("sac_fly"));
    }
}
