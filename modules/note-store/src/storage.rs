//! Snapshot persistence for the note collection.
//!
//! The whole collection is stored as one JSON array under a fixed key and
//! replaced wholesale on every save.

use note_assist_types::Note;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Key the snapshot is stored under.
pub const DEFAULT_SNAPSHOT_KEY: &str = "notes";

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    /// The stored snapshot is not a valid note array.
    Parse(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "snapshot I/O failed: {}", e),
            StorageError::Parse(e) => write!(f, "snapshot is malformed: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Parse(e)
    }
}

/// Durable home for the note collection.
pub trait SnapshotStorage {
    /// Returns the stored collection, or an empty one if nothing was saved.
    fn load(&self) -> Result<Vec<Note>, StorageError>;

    /// Overwrites the stored snapshot with `notes`.
    fn save(&self, notes: &[Note]) -> Result<(), StorageError>;
}

fn decode(raw: &str) -> Result<Vec<Note>, StorageError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(raw)?)
}

// =====================================================
// File-backed snapshot
// =====================================================

/// Stores the snapshot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSnapshotStorage {
    path: PathBuf,
}

impl FileSnapshotStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_key(dir, DEFAULT_SNAPSHOT_KEY)
    }

    pub fn with_key(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStorage for FileSnapshotStorage {
    fn load(&self) -> Result<Vec<Note>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, notes: &[Note]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(notes)?;
        // Write beside the target then rename so a reader never sees half a snapshot.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =====================================================
// In-memory snapshot
// =====================================================

/// Holds the raw snapshot string in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStorage {
    slot: Arc<Mutex<Option<String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a pre-existing raw snapshot, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let storage = Self::default();
        *storage.lock() = Some(raw.into());
        storage
    }

    pub fn raw(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    fn load(&self) -> Result<Vec<Note>, StorageError> {
        match self.lock().as_deref() {
            Some(raw) => decode(raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, notes: &[Note]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(notes)?;
        *self.lock() = Some(raw);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
