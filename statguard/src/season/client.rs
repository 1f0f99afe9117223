//! Deadline-bounded season client.
//!
//! Wraps any [`SeasonAggregate`] so the resolver sees a plain `Option<f64>`:
//! timeouts, transport failures and empty results all collapse to `None`.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::types::{SeasonAggregate, SeasonQueryError};
use crate::record::StatKey;

/// Outcome of a bounded season query, kept for telemetry.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonLookup {
    /// The source returned a value (not yet checked for validity).
    Found(f64),
    /// The source answered but had nothing.
    Empty,
    /// The deadline elapsed.
    TimedOut,
    /// The source reported an error.
    Failed(SeasonQueryError),
}

impl SeasonLookup {
    /// The value, if one was returned.
    pub fn value(&self) -> Option<f64> {
        match self {
            SeasonLookup::Found(v) => Some(*v),
            _ => None,
        }
    }
}

/// Season source with a per-query deadline.
#[derive(Clone)]
pub struct SeasonAggregateClient {
    source: Arc<dyn SeasonAggregate>,
    timeout: Duration,
}

impl SeasonAggregateClient {
    /// Wrap `source`, bounding each query by `timeout`.
    pub fn new(source: Arc<dyn SeasonAggregate>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// The configured deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Name of the wrapped source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Query the wrapped source under the deadline.
    ///
    /// Never fails: every failure mode is reported as a [`SeasonLookup`]
    /// variant and logged.
    pub async fn lookup(&self, key: &StatKey, as_of: NaiveDate) -> SeasonLookup {
        let query = self.source.season_average(key, as_of);

        match tokio::time::timeout(self.timeout, query).await {
            Ok(Ok(Some(value))) => SeasonLookup::Found(value),
            Ok(Ok(None)) => {
                debug!(key = %key, %as_of, source = self.source.name(), "No season data");
                SeasonLookup::Empty
            }
            Ok(Err(e)) => {
                warn!(key = %key, %as_of, source = self.source.name(), error = %e, "Season query failed");
                SeasonLookup::Failed(e)
            }
            Err(_) => {
                warn!(
                    key = %key,
                    %as_of,
                    source = self.source.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Season query timed out"
                );
                SeasonLookup::TimedOut
            }
        }
    }
}
