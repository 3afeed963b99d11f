//! Snapshot persistence for the quote collection.

use crate::error::Result;
use crate::record::{QuoteRecord, Timestamp};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Durable snapshot of the collection plus the last successful sync time.
///
/// Implementations must make `save` the single write path: the caller
/// serializes every mutation through replace-then-persist, so the store
/// on disk is always a complete collection, never a partial one.
pub trait SnapshotStore: Send + Sync {
    /// Loads the persisted collection, or `None` when no snapshot exists.
    fn load(&self) -> Result<Option<Vec<QuoteRecord>>>;

    /// Persists the full collection.
    fn save(&self, records: &[QuoteRecord]) -> Result<()>;

    /// Returns the recorded time of the last completed sync cycle.
    fn last_sync(&self) -> Result<Option<Timestamp>>;

    /// Records the time of the last completed sync cycle.
    fn set_last_sync(&self, timestamp: Timestamp) -> Result<()>;
}

/// In-memory snapshot store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySnapshot {
    records: Mutex<Option<Vec<QuoteRecord>>>,
    last_sync: Mutex<Option<Timestamp>>,
}

impl MemorySnapshot {
    /// Creates an empty in-memory snapshot store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a collection.
    #[must_use]
    pub fn with_records(records: Vec<QuoteRecord>) -> Self {
        Self {
            records: Mutex::new(Some(records)),
            last_sync: Mutex::new(None),
        }
    }
}

impl SnapshotStore for MemorySnapshot {
    fn load(&self) -> Result<Option<Vec<QuoteRecord>>> {
        Ok(self.records.lock().clone())
    }

    fn save(&self, records: &[QuoteRecord]) -> Result<()> {
        *self.records.lock() = Some(records.to_vec());
        Ok(())
    }

    fn last_sync(&self) -> Result<Option<Timestamp>> {
        Ok(*self.last_sync.lock())
    }

    fn set_last_sync(&self, timestamp: Timestamp) -> Result<()> {
        *self.last_sync.lock() = Some(timestamp);
        Ok(())
    }
}

/// On-disk snapshot document.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument {
    quotes: Vec<QuoteRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_sync: Option<Timestamp>,
}

/// File-backed snapshot store holding a single JSON document.
///
/// A missing file loads as `None`; parent directories are created on the
/// first save.
#[derive(Debug)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    /// Creates a snapshot store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Option<SnapshotDocument>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn write_document(&self, document: &SnapshotDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SnapshotStore for JsonFileSnapshot {
    fn load(&self) -> Result<Option<Vec<QuoteRecord>>> {
        Ok(self.read_document()?.map(|document| document.quotes))
    }

    fn save(&self, records: &[QuoteRecord]) -> Result<()> {
        let mut document = self.read_document()?.unwrap_or_default();
        document.quotes = records.to_vec();
        self.write_document(&document)
    }

    fn last_sync(&self) -> Result<Option<Timestamp>> {
        Ok(self.read_document()?.and_then(|document| document.last_sync))
    }

    fn set_last_sync(&self, timestamp: Timestamp) -> Result<()> {
        let mut document = self.read_document()?.unwrap_or_default();
        document.last_sync = Some(timestamp);
        self.write_document(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::default_quotes;

    #[test]
    fn memory_snapshot_roundtrip() {
        let snapshot = MemorySnapshot::new();
        assert!(snapshot.load().unwrap().is_none());

        snapshot.save(&default_quotes()).unwrap();
        let loaded = snapshot.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 5);

        snapshot.set_last_sync(123).unwrap();
        assert_eq!(snapshot.last_sync().unwrap(), Some(123));
    }

    #[test]
    fn file_snapshot_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonFileSnapshot::new(dir.path().join("quotes.json"));
        assert!(snapshot.load().unwrap().is_none());
        assert!(snapshot.last_sync().unwrap().is_none());
    }

    #[test]
    fn file_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("quotes.json");

        let snapshot = JsonFileSnapshot::new(&path);
        snapshot.save(&default_quotes()).unwrap();
        snapshot.set_last_sync(99).unwrap();

        // Re-open from disk.
        let reopened = JsonFileSnapshot::new(&path);
        let loaded = reopened.load().unwrap().unwrap();
        assert_eq!(loaded, default_quotes());
        assert_eq!(reopened.last_sync().unwrap(), Some(99));
    }

    #[test]
    fn file_snapshot_save_preserves_last_sync() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = JsonFileSnapshot::new(dir.path().join("quotes.json"));

        snapshot.set_last_sync(7).unwrap();
        snapshot.save(&default_quotes()).unwrap();
        assert_eq!(snapshot.last_sync().unwrap(), Some(7));
    }

    #[test]
    fn file_snapshot_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.json");
        fs::write(&path, "not json").unwrap();

        let snapshot = JsonFileSnapshot::new(&path);
        assert!(snapshot.load().is_err());
    }
}
