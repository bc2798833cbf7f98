//! Leaderboard wire records and their display rows.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display format for the date column.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A score as stored by the leaderboard backend. Unknown fields (the backend
/// also records the submitter's address) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: i64,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
}

/// Timestamps arrive either as text or as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Millis(f64),
    Text(String),
}

impl RawTimestamp {
    /// Calendar date in the local timezone, if the value is parseable.
    pub fn local_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Millis(ms) => date_from_millis(*ms),
            Self::Text(text) => parse_text_date(text.trim()),
        }
    }
}

fn date_from_millis(ms: f64) -> Option<NaiveDate> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms as i64)
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

fn parse_text_date(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    // Backend writes naive local time, so keep its calendar date as-is
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    text.parse::<f64>().ok().and_then(date_from_millis)
}

/// Date column text for a record; `-` when missing or unparseable.
pub fn format_date(timestamp: Option<&RawTimestamp>) -> String {
    timestamp
        .and_then(RawTimestamp::local_date)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One rendered leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-based position.
    pub rank: usize,
    pub score: i64,
    pub date: String,
}

impl LeaderboardRow {
    pub fn label(&self) -> String {
        format!("{}. Score: {}", self.rank, self.score)
    }
}

/// Rows in server order. The server sends best-first; we do not re-sort.
pub fn rows_from_records(records: &[ScoreRecord]) -> Vec<LeaderboardRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| LeaderboardRow {
            rank: i + 1,
            score: r.score,
            date: format_date(r.timestamp.as_ref()),
        })
        .collect()
}

/// Decode a response body. Anything that is not a list counts as an empty
/// leaderboard rather than an error; list entries that are not records are
/// skipped one by one.
pub fn decode_records(body: serde_json::Value) -> Vec<ScoreRecord> {
    let entries = match body {
        serde_json::Value::Array(entries) => entries,
        other => {
            log::warn!("Ignoring leaderboard payload that is not a list: {}", other);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<ScoreRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping leaderboard entry {}: {}", i, e);
                None
            }
        })
        .collect()
}
