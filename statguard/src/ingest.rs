//! Feed row parsing.
//!
//! The upstream feed delivers a JSON array of objects. Only the identity
//! and the date are required; the raw average is read leniently from the
//! first of `raw_average`, `batting_avg` or `avg` that is present:
//!
//! | JSON value          | raw average   |
//! |---------------------|---------------|
//! | number              | that number   |
//! | numeric string      | parsed number |
//! | null, other types   | `None`        |
//!
//! When none of those fields is present, the raw average is derived from
//! `hits`/`at_bats` (non-negative integers) or, failing that, from an
//! `events` array of outcome names. A present but null field is not
//! derived from the counts.
//!
//! Range checking is left to the resolver, so `1.5` or `-0.5` come through
//! unchanged. A row without identity or with an unreadable date is
//! rejected here and never reaches resolution.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::hitting::{average_from_counts, average_from_events};
use crate::record::StatKey;

/// Field names checked, in order, for the raw average.
pub const RAW_AVERAGE_FIELDS: [&str; 3] = ["raw_average", "batting_avg", "avg"];

/// One feed row at the validation boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub key: StatKey,
    pub game_date: NaiveDate,
    pub raw_average: Option<f64>,
}

impl StatRow {
    pub fn new(key: StatKey, game_date: NaiveDate, raw_average: Option<f64>) -> Self {
        Self {
            key,
            game_date,
            raw_average,
        }
    }
}

/// A row that cannot be validated because its shape is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowShapeError {
    #[error("row {index}: expected a JSON object")]
    NotAnObject { index: usize },

    #[error("row {index}: missing player_id or team")]
    MissingIdentity { index: usize },

    #[error("row {index}: missing game_date")]
    MissingDate { index: usize },

    #[error("row {index}: invalid game_date '{value}'")]
    InvalidDate { index: usize, value: String },
}

impl RowShapeError {
    /// Position of the rejected row in the feed.
    pub fn index(&self) -> usize {
        match self {
            RowShapeError::NotAnObject { index }
            | RowShapeError::MissingIdentity { index }
            | RowShapeError::MissingDate { index }
            | RowShapeError::InvalidDate { index, .. } => *index,
        }
    }
}

/// The feed as a whole could not be read.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read feed {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Feed is not a JSON array: {0}")]
    Malformed(String),
}

/// Parsed rows, each either usable or rejected.
pub type RowResults = Vec<Result<StatRow, RowShapeError>>;

/// Parse a feed document.
///
/// Fails only when the document itself is unusable; individual bad rows are
/// returned as errors in place.
pub fn parse_rows(json: &str) -> Result<RowResults, IngestError> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| IngestError::Malformed(e.to_string()))?;

    let Value::Array(items) = document else {
        return Err(IngestError::Malformed(format!(
            "top-level value is {}",
            type_name(&document)
        )));
    };

    Ok(items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_row(index, item))
        .collect())
}

/// Read and parse a feed file.
pub fn load_rows(path: &Path) -> Result<RowResults, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_rows(&text)
}

/// Parse a single row; `index` is only used for error reporting.
pub fn parse_row(index: usize, value: &Value) -> Result<StatRow, RowShapeError> {
    let Value::Object(fields) = value else {
        return Err(RowShapeError::NotAnObject { index });
    };

    let key = row_key(fields).ok_or(RowShapeError::MissingIdentity { index })?;

    let date_text = fields
        .get("game_date")
        .and_then(Value::as_str)
        .ok_or(RowShapeError::MissingDate { index })?;
    let game_date = parse_game_date(date_text).ok_or_else(|| RowShapeError::InvalidDate {
        index,
        value: date_text.to_string(),
    })?;

    let raw_average = match RAW_AVERAGE_FIELDS.iter().find_map(|name| fields.get(*name)) {
        Some(value) => lenient_average(value),
        None => derived_average(fields),
    };

    Ok(StatRow::new(key, game_date, raw_average))
}

/// Read a JSON value as a number if it plausibly is one.
pub fn lenient_average(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Average from `hits`/`at_bats`, else from an `events` list.
fn derived_average(fields: &Map<String, Value>) -> Option<f64> {
    let count = |name: &str| {
        fields
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };
    if let (Some(hits), Some(at_bats)) = (count("hits"), count("at_bats")) {
        return average_from_counts(hits, at_bats);
    }

    let events = fields.get("events").and_then(Value::as_array)?;
    let names: Option<Vec<&str>> = events.iter().map(Value::as_str).collect();
    average_from_events(names?)
}

fn row_key(fields: &Map<String, Value>) -> Option<StatKey> {
    if let Some(id) = fields.get("player_id").and_then(identity_text) {
        return Some(StatKey::player(&id));
    }
    fields
        .get("team")
        .and_then(identity_text)
        .map(|team| StatKey::team(&team))
}

/// Identifiers arrive as strings or bare integers.
pub(crate) fn identity_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) if n.is_u64() || n.is_i64() => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_game_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let date_part = match text.char_indices().nth(10) {
        Some((i, 'T' | ' ')) => &text[..i],
        _ => text,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
