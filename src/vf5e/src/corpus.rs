//! Corpus file access
//!
//! Discovery of JSON source files, the validating parse of source documents
//! into record lists, (name, source) deduplication, and JSON output.

use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A single record from the corpus. Field order is preserved.
pub type RawRecord = Map<String, Value>;

// ============================================================================
// Record helpers
// ============================================================================

/// Text form of a scalar field, as it would appear in a phrase
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// String field, if present and a string
pub fn field_str<'a>(record: &'a RawRecord, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Loose truthiness: absent, null, false, 0, "" and empty containers are false
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Field value if truthy
pub fn truthy_field<'a>(record: &'a RawRecord, key: &str) -> Option<&'a Value> {
    let value = record.get(key);
    if is_truthy(value) {
        value
    } else {
        None
    }
}

// ============================================================================
// Deduplication
// ============================================================================

/// Composite (name, source) identity of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub name: Option<String>,
    pub source: Option<String>,
}

impl RecordKey {
    pub fn new(name: Option<String>, source: Option<String>) -> Self {
        Self { name, source }
    }

    /// Key of a raw record; absent or null fields are `None`
    pub fn of(record: &RawRecord) -> Self {
        let text = |key: &str| match record.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(display_value(value)),
        };
        Self::new(text("name"), text("source"))
    }
}

/// Keep the first record per (name, source), preserving order.
///
/// Returns the kept records and the number dropped.
pub fn dedup_records(records: Vec<RawRecord>) -> (Vec<RawRecord>, usize) {
    let mut seen = HashSet::new();
    let total = records.len();

    let kept: Vec<RawRecord> = records
        .into_iter()
        .filter(|record| seen.insert(RecordKey::of(record)))
        .collect();

    let dropped = total - kept.len();
    (kept, dropped)
}

// ============================================================================
// Source documents
// ============================================================================

/// Top-level shape of a source file
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDocument {
    /// Object whose list values are record collections (`{"item": [...], "_meta": {...}}`)
    Collections(Map<String, Value>),
    /// Bare list of records
    Records(Vec<Value>),
}

impl SourceDocument {
    /// Classify parsed JSON; scalars are rejected
    pub fn from_json(path: &Path, value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(SourceDocument::Collections(map)),
            Value::Array(items) => Ok(SourceDocument::Records(items)),
            other => Err(Error::MalformedInput {
                path: path.to_path_buf(),
                reason: format!("expected an object or a list, got {}", json_type(&other)),
            }),
        }
    }

    /// Read and parse a source file
    pub fn load(path: &Path) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedInput {
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
        let value: Value = serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
        Self::from_json(path, value)
    }

    /// Flatten into records, in document order.
    ///
    /// Returns the records and the number of non-object elements dropped.
    pub fn into_records(self) -> (Vec<RawRecord>, usize) {
        let items: Vec<Value> = match self {
            SourceDocument::Records(items) => items,
            SourceDocument::Collections(map) => map
                .into_iter()
                .filter_map(|(_, value)| match value {
                    Value::Array(items) => Some(items),
                    _ => None,
                })
                .flatten()
                .collect(),
        };

        let total = items.len();
        let records: Vec<RawRecord> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect();

        let dropped = total - records.len();
        (records, dropped)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Read a merged list written by an earlier stage
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(Error::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let (records, dropped) = SourceDocument::load(path)?.into_records();
    if dropped > 0 {
        tracing::debug!("{}: dropped {} non-object entries", path.display(), dropped);
    }
    Ok(records)
}

// ============================================================================
// Discovery
// ============================================================================

/// Every `.json` file under `root`, sorted by path, skipping `excluded` directories
pub fn list_json_files(root: &Path, excluded: &[PathBuf]) -> Vec<PathBuf> {
    let excluded: Vec<PathBuf> = excluded
        .iter()
        .filter_map(|dir| dir.canonicalize().ok())
        .collect();

    walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            entry
                .path()
                .canonicalize()
                .map(|dir| !excluded.contains(&dir))
                .unwrap_or(true)
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipped unreadable path: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_json_extension(path))
        .collect()
}

fn has_json_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".json"))
}

/// Whether a file's name starts with the category key
pub fn matches_category(path: &Path, key: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(key) && n.ends_with(".json"))
}

// ============================================================================
// Output
// ============================================================================

/// Write a value as pretty JSON (two-space indent, UTF-8 kept literal)
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let write_err = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }

    let file = fs::File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| write_err(e.into()))?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    Ok(())
}
