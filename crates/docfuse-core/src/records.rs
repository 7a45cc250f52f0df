//! Record loading from `.json` / `.jsonl` files and text-field extraction.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::Record;

/// Concatenate the configured fields of `record`, in order, joined with single
/// spaces. Missing or null fields contribute an empty string; strings are taken
/// verbatim and any other value uses its JSON rendering.
pub fn extract_text(record: &Record, fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| match record.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// One JSON array of objects.
    Json,
    /// One JSON object per line.
    JsonLines,
}

impl RecordFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Some(RecordFormat::Json),
            Some("jsonl") | Some("ndjson") => Some(RecordFormat::JsonLines),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct RecordLoader;

impl RecordLoader {
    pub fn new() -> Self { Self }

    /// Load every record under `path` (a single file or a directory tree).
    pub fn load_path(&self, path: &Path) -> Result<Vec<Record>> {
        self.load_path_limited(path, usize::MAX)
    }

    /// Like `load_path` but reads at most `limit` files.
    pub fn load_path_limited(&self, path: &Path, limit: usize) -> Result<Vec<Record>> {
        if !path.exists() {
            return Err(Error::Record(format!("{} does not exist", path.display())));
        }
        let mut files = if path.is_file() { vec![path.to_path_buf()] } else { self.list_record_files(path) };
        if files.is_empty() {
            info!(dir = %path.display(), "no .json/.jsonl files found");
            return Ok(vec![]);
        }
        if files.len() > limit { files.truncate(limit); info!(limit, "limited record files"); }
        let mut all_records = Vec::new();
        for (file_index, file_path) in files.iter().enumerate() {
            info!(file = %file_path.display(), n = file_index + 1, total = files.len(), "reading records");
            all_records.extend(self.load_file(file_path)?);
        }
        info!(files = files.len(), records = all_records.len(), "loaded records");
        Ok(all_records)
    }

    pub fn load_file(&self, path: &Path) -> Result<Vec<Record>> {
        let format = RecordFormat::from_path(path)
            .ok_or_else(|| Error::Record(format!("{}: unsupported extension", path.display())))?;
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Record(format!("{}: {}", path.display(), e)))?;
        self.parse_str(&content, format, &path.display().to_string())
    }

    /// Parse records from an in-memory document; `origin` names it in errors.
    pub fn parse_str(&self, content: &str, format: RecordFormat, origin: &str) -> Result<Vec<Record>> {
        match format {
            RecordFormat::Json => {
                let value: Value = serde_json::from_str(content)
                    .map_err(|e| Error::Record(format!("{}: {}", origin, e)))?;
                match value {
                    Value::Array(items) => items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| into_record(item, origin, i + 1))
                        .collect(),
                    Value::Object(map) => Ok(vec![map]),
                    _ => Err(Error::Record(format!("{}: expected an array of objects", origin))),
                }
            }
            RecordFormat::JsonLines => {
                let mut records = Vec::new();
                for (line_no, line) in content.lines().enumerate() {
                    let line = line.trim(); if line.is_empty() { continue; }
                    let value: Value = serde_json::from_str(line)
                        .map_err(|e| Error::Record(format!("{}:{}: {}", origin, line_no + 1, e)))?;
                    records.push(into_record(value, origin, line_no + 1)?);
                }
                Ok(records)
            }
        }
    }

    pub fn list_record_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path(); if RecordFormat::from_path(path).is_some() { files.push(path.to_path_buf()); }
        }
        files.sort(); files
    }
}

fn into_record(value: Value, origin: &str, position: usize) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::Record(format!("{}:{}: expected an object, got {}", origin, position, other))),
    }
}
