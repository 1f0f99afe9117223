//! Integration tests for the validation pipeline.
//!
//! These tests drive the public API end to end:
//! - Feed JSON → ingest → facade → validated records
//! - Fallback tier selection with a controlled clock
//! - Season write-through and cache expiry across calls
//!
//! Run with: `cargo test --test fallback_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use statguard::clock::ManualClock;
use statguard::config::ValidatorConfig;
use statguard::ingest::{parse_rows, RowShapeError, StatRow};
use statguard::season::{
    BoxFuture, NoSeasonData, SeasonAggregate, SeasonQueryError, StaticSeasonSource,
};
use statguard::{IntegrationFacade, Quality, SourceTier, StatKey};

// ============================================================================
// Helper Functions
// ============================================================================

const HOUR: Duration = Duration::from_secs(3600);

fn game_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()
}

/// Season source that counts queries and answers from a table.
struct CountingSeason {
    table: StaticSeasonSource,
    calls: AtomicUsize,
}

impl CountingSeason {
    fn new(table: StaticSeasonSource) -> Self {
        Self {
            table,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SeasonAggregate for CountingSeason {
    fn season_average<'a>(
        &'a self,
        key: &'a StatKey,
        as_of: NaiveDate,
    ) -> BoxFuture<'a, Result<Option<f64>, SeasonQueryError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table.season_average(key, as_of)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Season source that never answers.
struct HangingSeason;

impl SeasonAggregate for HangingSeason {
    fn season_average<'a>(
        &'a self,
        _key: &'a StatKey,
        _as_of: NaiveDate,
    ) -> BoxFuture<'a, Result<Option<f64>, SeasonQueryError>> {
        Box::pin(std::future::pending::<Result<Option<f64>, SeasonQueryError>>())
    }

    fn name(&self) -> &str {
        "hanging"
    }
}

fn facade_with_clock(season: Arc<dyn SeasonAggregate>) -> (IntegrationFacade, Arc<ManualClock>) {
    let clock = ManualClock::shared_now();
    let facade =
        IntegrationFacade::with_clock(ValidatorConfig::default(), season, clock.clone()).unwrap();
    (facade, clock)
}

const FEED: &str = r#"[
    {"player_id": "545361", "game_date": "2024-07-04", "batting_avg": 0.312},
    {"player_id": "592450", "game_date": "2024-07-04", "batting_avg": null},
    {"player_id": "660271", "game_date": "2024-07-04", "batting_avg": 1.5},
    {"player_id": "605141", "game_date": "2024-07-04", "batting_avg": "-0.5"},
    {"player_id": "", "game_date": "2024-07-04", "batting_avg": 0.2},
    {"team": "NYY", "game_date": "2024-07-04", "avg": 0.0}
]"#;

// ============================================================================
// Integration Tests
// ============================================================================

/// A mixed feed resolves every usable row and rejects the malformed one.
#[tokio::test]
async fn test_feed_to_validated_records() {
    let season = StaticSeasonSource::new().with_average(StatKey::player("592450"), 0.301);
    let (facade, _clock) = facade_with_clock(Arc::new(season));

    let parsed = parse_rows(FEED).unwrap();
    let (rows, rejected): (Vec<_>, Vec<_>) = parsed.into_iter().partition(Result::is_ok);
    let rows: Vec<StatRow> = rows.into_iter().map(Result::unwrap).collect();
    let rejected: Vec<RowShapeError> = rejected.into_iter().map(Result::unwrap_err).collect();

    assert_eq!(rejected, vec![RowShapeError::MissingIdentity { index: 4 }]);

    let records = facade.validate_batch(&rows).await;
    let tiers: Vec<SourceTier> = records.iter().map(|r| r.source_tier).collect();
    assert_eq!(
        tiers,
        vec![
            SourceTier::Raw,
            SourceTier::SeasonAverage,
            SourceTier::LeagueDefault,
            SourceTier::LeagueDefault,
            SourceTier::Raw,
        ]
    );

    // Zero is a real value, not a missing one
    assert_eq!(records[4].resolved_average, 0.0);
    assert!(records
        .iter()
        .all(|r| (0.0..=1.0).contains(&r.resolved_average)));
}

/// Season value is cached, then served as PREVIOUS_GAME until it expires.
#[tokio::test]
async fn test_season_write_through_and_expiry() {
    let season = Arc::new(CountingSeason::new(
        StaticSeasonSource::new().with_average(StatKey::player("1"), 0.301),
    ));
    let (facade, clock) = facade_with_clock(season.clone());
    let key = StatKey::player("1");

    let first = facade.validate_value(&key, game_day(), None).await;
    assert_eq!(first.source_tier, SourceTier::SeasonAverage);
    assert_eq!(first.quality, Quality::Medium);

    clock.advance(HOUR * 2);
    let second = facade.validate_value(&key, game_day(), None).await;
    assert_eq!(second.source_tier, SourceTier::PreviousGame);
    assert_eq!(second.quality, Quality::High);
    assert_eq!(season.calls(), 1);

    clock.advance(HOUR * 23);
    let third = facade.validate_value(&key, game_day(), None).await;
    assert_eq!(third.source_tier, SourceTier::SeasonAverage);
    assert_eq!(season.calls(), 2);

    let stats = facade.stats();
    assert_eq!(stats.cache.expirations, 1);
    assert_eq!(stats.resolver.season_average, 2);
    assert_eq!(stats.resolver.previous_game, 1);
}

/// With nothing cached and no season data, the league default applies.
#[tokio::test]
async fn test_expired_entry_without_season_data_uses_league_default() {
    let (facade, clock) = facade_with_clock(Arc::new(NoSeasonData));
    let key = StatKey::player("9");

    facade.remember(&key, 0.280);
    clock.advance(HOUR * 25);

    let record = facade.validate_value(&key, game_day(), Some(f64::NAN)).await;
    assert_eq!(record.source_tier, SourceTier::LeagueDefault);
    assert_eq!(record.resolved_average, 0.244);
    assert_eq!(record.quality, Quality::InsufficientData);
}

/// A season source that never answers cannot stall the batch.
#[tokio::test(start_paused = true)]
async fn test_hanging_season_source_is_bounded() {
    let facade = IntegrationFacade::new(
        ValidatorConfig::default().with_season_timeout(Duration::from_millis(200)),
        Arc::new(HangingSeason),
    )
    .unwrap();

    let rows: Vec<StatRow> = (0..4)
        .map(|i| StatRow::new(StatKey::player(i.to_string()), game_day(), None))
        .collect();

    let records = facade.validate_batch(&rows).await;

    assert_eq!(records.len(), 4);
    assert!(records
        .iter()
        .all(|r| r.source_tier == SourceTier::LeagueDefault));
    assert_eq!(facade.stats().resolver.season_timeouts, 4);
}

/// Records serialize with upper-case tier and quality tags.
#[tokio::test]
async fn test_records_serialize_to_json() {
    let (facade, _clock) = facade_with_clock(Arc::new(NoSeasonData));
    let record = facade
        .validate_value(&StatKey::player("1"), game_day(), None)
        .await;

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["key"], "player:1");
    assert_eq!(json["game_date"], "2024-07-04");
    assert_eq!(json["source_tier"], "LEAGUE_DEFAULT");
    assert_eq!(json["quality"], "INSUFFICIENT_DATA");
    assert_eq!(json["raw_average"], serde_json::Value::Null);
}

/// Cancelling up front validates nothing.
#[tokio::test]
async fn test_cancelled_batch() {
    let (facade, _clock) = facade_with_clock(Arc::new(NoSeasonData));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let rows = vec![StatRow::new(StatKey::player("1"), game_day(), Some(0.3))];
    let outcome = facade.validate_batch_until(&rows, cancel).await;

    assert!(outcome.cancelled);
    assert!(outcome.records.is_empty());
}
