//! In-memory season table.
//!
//! Each line is an average that became known on an optional `as_of` date.
//! A query returns the most recent line on or before the requested date;
//! undated lines apply to every date but lose to any dated line that
//! qualifies.
//!
//! Table files are JSON arrays:
//!
//! ```json
//! [
//!   {"player_id": "545361", "average": 0.301},
//!   {"player_id": "592450", "hits": 85, "at_bats": 300, "as_of": "2024-06-30"},
//!   {"team": "NYY", "events": ["single", "strikeout", "home_run"]}
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use super::types::{BoxFuture, SeasonAggregate, SeasonQueryError};
use crate::hitting::{average_from_counts, average_from_events};
use crate::ingest::identity_text;
use crate::record::StatKey;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SeasonLine {
    as_of: Option<NaiveDate>,
    average: f64,
}

/// One row of a season table file.
#[derive(Debug, Clone, Deserialize)]
struct TableRow {
    player_id: Option<Value>,
    team: Option<Value>,
    as_of: Option<NaiveDate>,
    average: Option<f64>,
    hits: Option<u32>,
    at_bats: Option<u32>,
    events: Option<Vec<String>>,
}

impl TableRow {
    fn key(&self) -> Option<StatKey> {
        if let Some(id) = self.player_id.as_ref().and_then(identity_text) {
            return Some(StatKey::player(&id));
        }
        self.team
            .as_ref()
            .and_then(identity_text)
            .map(|team| StatKey::team(&team))
    }

    fn average(&self) -> Option<f64> {
        self.average
            .or_else(|| match (self.hits, self.at_bats) {
                (Some(h), Some(ab)) => average_from_counts(h, ab),
                _ => None,
            })
            .or_else(|| self.events.as_ref().and_then(|events| average_from_events(events)))
    }
}

/// Season source backed by an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticSeasonSource {
    lines: HashMap<StatKey, Vec<SeasonLine>>,
}

impl StaticSeasonSource {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an undated average for `key`.
    pub fn with_average(mut self, key: StatKey, average: f64) -> Self {
        self.insert(key, None, average);
        self
    }

    /// Add an average for `key` known as of `as_of`.
    pub fn with_average_as_of(mut self, key: StatKey, as_of: NaiveDate, average: f64) -> Self {
        self.insert(key, Some(as_of), average);
        self
    }

    /// Insert a line, keeping each key's lines ordered by date.
    pub fn insert(&mut self, key: StatKey, as_of: Option<NaiveDate>, average: f64) {
        let lines = self.lines.entry(key).or_default();
        lines.push(SeasonLine { as_of, average });
        // None sorts before every date, so undated lines lose ties.
        lines.sort_by_key(|l| l.as_of);
    }

    /// Number of identities with at least one line.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the table has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Parse a JSON table.
    pub fn from_json(text: &str) -> Result<Self, SeasonQueryError> {
        let rows: Vec<TableRow> =
            serde_json::from_str(text).map_err(|e| SeasonQueryError::Decode(e.to_string()))?;

        let mut table = Self::new();
        for (index, row) in rows.iter().enumerate() {
            let key = row.key().ok_or_else(|| {
                SeasonQueryError::Decode(format!("row {}: missing player_id or team", index))
            })?;
            let average = row.average().ok_or_else(|| {
                SeasonQueryError::Decode(format!(
                    "row {}: needs average, hits/at_bats, or events",
                    index
                ))
            })?;
            table.insert(key, row.as_of, average);
        }
        Ok(table)
    }

    /// Load a JSON table from disk.
    pub fn load(path: &Path) -> Result<Self, SeasonQueryError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SeasonQueryError::Transport(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    fn lookup(&self, key: &StatKey, as_of: NaiveDate) -> Option<f64> {
        self.lines.get(key).and_then(|lines| {
            lines
                .iter()
                .rev()
                .find(|l| l.as_of.map_or(true, |d| d <= as_of))
                .map(|l| l.average)
        })
    }
}

impl SeasonAggregate for StaticSeasonSource {
    fn season_average<'a>(
        &'a self,
        key: &'a StatKey,
        as_of: NaiveDate,
    ) -> BoxFuture<'a, Result<Option<f64>, SeasonQueryError>> {
        Box::pin(async move { Ok(self.lookup(key, as_of)) })
    }

    fn name(&self) -> &str {
        "static-table"
    }
}
