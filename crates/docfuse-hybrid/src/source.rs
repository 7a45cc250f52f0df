//! Record sources for store-backed indexes, plus the publish-window filter.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, info};

use docfuse_core::records::RecordLoader;
use docfuse_core::traits::RecordSource;
use docfuse_core::types::Record;

/// Parse a record timestamp. Accepts RFC 3339, `%Y-%m-%d %H:%M:%S` (UTC),
/// `%Y-%m-%d` and unix seconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        _ => None,
    }
}

fn record_time(record: &Record, field: &str) -> Option<DateTime<Utc>> {
    record.get(field).and_then(parse_timestamp)
}

/// Keep records whose `field` lies within `window` of `now`. Records without a
/// parsable timestamp are kept.
pub fn filter_window(records: Vec<Record>, field: &str, window: Duration, now: DateTime<Utc>) -> Vec<Record> {
    let cutoff = now - window;
    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| record_time(r, field).map_or(true, |ts| ts >= cutoff))
        .collect();
    debug!(before, after = kept.len(), %cutoff, "window filter applied");
    kept
}

/// Records loaded from `.json` / `.jsonl` files, newest first by a timestamp field.
pub struct FileRecordSource {
    path: PathBuf,
    timestamp_field: String,
    loader: RecordLoader,
}

impl FileRecordSource {
    pub fn new(path: impl AsRef<Path>, timestamp_field: impl Into<String>) -> Self {
        Self { path: path.as_ref().to_path_buf(), timestamp_field: timestamp_field.into(), loader: RecordLoader::new() }
    }

    pub fn path(&self) -> &Path { &self.path }
}

impl RecordSource for FileRecordSource {
    fn fetch_recent(&self, limit: usize) -> anyhow::Result<Vec<Record>> {
        let mut records = self
            .loader
            .load_path(&self.path)
            .with_context(|| format!("Failed to read records from {}", self.path.display()))?;
        let field = self.timestamp_field.as_str();
        // stable: equal or undated records keep file order, undated go last
        records.sort_by(|a, b| match (record_time(a, field), record_time(b, field)) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        records.truncate(limit);
        info!(path = %self.path.display(), records = records.len(), limit, "fetched recent records");
        Ok(records)
    }
}

/// In-memory source; returns the first `limit` records as given.
#[derive(Debug, Clone, Default)]
pub struct VecRecordSource {
    records: Vec<Record>,
}

impl VecRecordSource {
    pub fn new(records: Vec<Record>) -> Self { Self { records } }
}

impl RecordSource for VecRecordSource {
    fn fetch_recent(&self, limit: usize) -> anyhow::Result<Vec<Record>> {
        Ok(self.records.iter().take(limit).cloned().collect())
    }
}
