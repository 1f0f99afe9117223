//! Season-aggregate collaborator interface.

use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use thiserror::Error;

use crate::record::StatKey;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors a season source can report.
///
/// The resolver treats every variant the same way: as "no data". Deadlines
/// are enforced by [`SeasonAggregateClient`](super::SeasonAggregateClient),
/// which reports them as [`SeasonLookup::TimedOut`](super::SeasonLookup).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeasonQueryError {
    /// Transport-level failure (connection refused, HTTP status, ...).
    #[error("season query transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("season query returned malformed data: {0}")]
    Decode(String),
}

/// Source of season-to-date averages.
///
/// # Returns
///
/// - `Ok(Some(avg))` when the source knows an average for `key` as of `as_of`
/// - `Ok(None)` when the source has no data
/// - `Err(_)` on failure
///
/// Returned values are not trusted: the resolver re-checks them.
pub trait SeasonAggregate: Send + Sync {
    /// Query the season-to-date average for `key` as of `as_of`.
    fn season_average<'a>(
        &'a self,
        key: &'a StatKey,
        as_of: NaiveDate,
    ) -> BoxFuture<'a, Result<Option<f64>, SeasonQueryError>>;

    /// Human-readable source name for logs.
    fn name(&self) -> &str;
}

/// Season source that never has data.
///
/// Useful when no collaborator is configured: resolution goes straight from
/// the cache tier to the league default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeasonData;

impl SeasonAggregate for NoSeasonData {
    fn season_average<'a>(
        &'a self,
        _key: &'a StatKey,
        _as_of: NaiveDate,
    ) -> BoxFuture<'a, Result<Option<f64>, SeasonQueryError>> {
        Box::pin(async { Ok(None) })
    }

    fn name(&self) -> &str {
        "none"
    }
}
