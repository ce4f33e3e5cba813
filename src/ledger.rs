// Local append-only record of every upload attempt made by the tool.
//
// The file holds a JSON array of `UploadRecord`s. A missing or unreadable
// file counts as an empty array, and a single bare object left by older
// versions is wrapped into a one-element array before appending.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::LedgerError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
}

/// One upload attempt. Written before the upload is triggered, so it exists
/// whether or not the storage service later accepts the transfer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub filename: String,
    pub url: String,
    pub size_bytes: u64,
    pub status: UploadStatus,
}

impl UploadRecord {
    pub fn uploading(filename: impl Into<String>, url: impl Into<String>, size_bytes: u64) -> Self {
        UploadRecord {
            filename: filename.into(),
            url: url.into(),
            size_bytes,
            status: UploadStatus::Uploading,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetadataLedger {
    path: PathBuf,
}

impl MetadataLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        MetadataLedger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries as raw JSON values, in file order. Never fails:
    /// absence and corruption both yield an empty list.
    pub fn load(&self) -> Vec<Value> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ledger unreadable, starting fresh");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(entries)) => entries,
            Ok(obj @ Value::Object(_)) => vec![obj],
            Ok(other) => {
                warn!(path = %self.path.display(), kind = json_kind(&other), "ledger is not a list, starting fresh");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ledger is not valid JSON, starting fresh");
                Vec::new()
            }
        }
    }

    /// Entries that match the `UploadRecord` shape; anything else is skipped.
    pub fn records(&self) -> Vec<UploadRecord> {
        self.load()
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }

    /// Append `record` and rewrite the whole file. Returns the new entry count.
    pub fn append(&self, record: &UploadRecord) -> Result<usize, LedgerError> {
        let mut entries = self.load();
        entries.push(serde_json::to_value(record)?);
        self.write_all(&entries)?;
        Ok(entries.len())
    }

    // Write to a sibling temp file and rename it over the ledger, so a crash
    // mid-write never leaves a truncated file behind.
    fn write_all(&self, entries: &[Value]) -> Result<(), LedgerError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        let json = serde_json::to_string_pretty(entries)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| LedgerError::Io(e.error))?;
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger_in(dir: &TempDir) -> MetadataLedger {
        MetadataLedger::new(dir.path().join("image_info.json"))
    }

    fn record(n: u64) -> UploadRecord {
        UploadRecord::uploading(format!("cat{n}.jpg"), format!("https://img.example/{n}"), n * 100)
    }

    #[test]
    fn missing_file_yields_single_record() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        assert_eq!(ledger.append(&record(1)).unwrap(), 1);
        assert_eq!(ledger.records(), vec![record(1)]);
    }

    #[test]
    fn corrupt_file_yields_single_record() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(ledger.path(), "{not json").unwrap();
        assert_eq!(ledger.append(&record(1)).unwrap(), 1);
        assert_eq!(ledger.records(), vec![record(1)]);
    }

    #[test]
    fn scalar_json_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(ledger.path(), "42").unwrap();
        assert_eq!(ledger.append(&record(1)).unwrap(), 1);
    }

    #[test]
    fn bare_object_is_wrapped() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(
            ledger.path(),
            r#"{"filename": "cat.jpg", "url": "https://img.example/c", "size_bytes": 7, "status": "uploading"}"#,
        )
        .unwrap();

        assert_eq!(ledger.append(&record(2)).unwrap(), 2);
        let records = ledger.records();
        assert_eq!(records[0], UploadRecord::uploading("cat.jpg", "https://img.example/c", 7));
        assert_eq!(records[1], record(2));
    }

    #[test]
    fn append_preserves_existing_entries_verbatim() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger.append(&record(1)).unwrap();
        ledger.append(&record(2)).unwrap();
        let before = fs::read_to_string(ledger.path()).unwrap();

        ledger.append(&record(3)).unwrap();
        let after = fs::read_to_string(ledger.path()).unwrap();

        // Everything up to the closing of the second entry is unchanged.
        let prefix_end = before.rfind('}').unwrap() + 1;
        assert_eq!(&after[..prefix_end], &before[..prefix_end]);
        assert_eq!(ledger.records(), vec![record(1), record(2), record(3)]);
    }

    #[test]
    fn foreign_entries_survive_with_key_order() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        fs::write(ledger.path(), r#"[{"zeta": 1, "alpha": "ü"}]"#).unwrap();

        ledger.append(&record(1)).unwrap();
        let entries = ledger.load();
        assert_eq!(entries.len(), 2);
        let keys: Vec<_> = entries[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        // only well-formed records come back typed
        assert_eq!(ledger.records(), vec![record(1)]);
    }

    #[test]
    fn output_is_indented_and_keeps_non_ascii() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger
            .append(&UploadRecord::uploading("кот.jpg", "https://img.example/кот", 1))
            .unwrap();
        let text = fs::read_to_string(ledger.path()).unwrap();
        assert!(text.contains("кот.jpg"));
        assert!(text.contains("\n    \"filename\": \"кот.jpg\""));
        assert!(text.contains("\"status\": \"uploading\""));
    }
}
