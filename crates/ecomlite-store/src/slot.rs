//! # Key-Value Slots
//!
//! A slot is a named durable string value, the storage primitive under the
//! cart and the profile.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  KeyValueSlot                                                           │
//! │  ├── read(key)         → Option<String>                                │
//! │  ├── write(key, value) → replaces the whole value                      │
//! │  └── remove(key)       → no-op when absent                             │
//! │                                                                         │
//! │  FileSlot     <dir>/<key>.json, written to a temp file then renamed    │
//! │  MemorySlot   HashMap behind a Mutex, optional byte quota              │
//! │  Arc<S>       shares one slot between repositories                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Durable storage for named string values.
///
/// Implementations must be usable from several threads; writes to one key
/// replace the previous value entirely.
pub trait KeyValueSlot: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key`.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueSlot + ?Sized> KeyValueSlot for Arc<S> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

// =============================================================================
// File Slot
// =============================================================================

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Opens a slot directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(dir.display().to_string(), e))?;
        debug!(dir = %dir.display(), "Opened file slot directory");
        Ok(FileSlot { dir })
    }

    /// The directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueSlot for FileSlot {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        // Readers either see the old file or the new one, never a torn write.
        fs::write(&tmp, value).map_err(|e| StoreError::io(key, e))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::io(key, e));
        }

        debug!(key = %key, bytes = value.len(), "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(key, e)),
        }
    }
}

/// Keys become file names: ASCII letters, digits, `_`, `-` and `.` only.
fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// Memory Slot
// =============================================================================

/// In-memory slot, used in tests and when no data directory is usable.
///
/// An optional quota caps the total bytes held across all keys; a write that
/// would exceed it fails with [`StoreError::QuotaExceeded`] and leaves the
/// previous value in place.
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemorySlot {
    /// Creates an empty, unbounded slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty slot that holds at most `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        MemorySlot {
            values: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Seeds a value without going through the quota (for tests).
    pub fn seed(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueSlot for MemorySlot {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = self.lock();

        if let Some(quota) = self.quota {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let size = others + key.len() + value.len();
            if size > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    size,
                    quota,
                });
            }
        }

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_slot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::open(dir.path().join("data")).unwrap();

        assert_eq!(slot.read("ecomlite_cart_v1").unwrap(), None);

        slot.write("ecomlite_cart_v1", r#"{"items":{}}"#).unwrap();
        assert_eq!(
            slot.read("ecomlite_cart_v1").unwrap().as_deref(),
            Some(r#"{"items":{}}"#)
        );
        assert!(dir.path().join("data/ecomlite_cart_v1.json").exists());
        assert!(!dir.path().join("data/ecomlite_cart_v1.json.tmp").exists());

        slot.remove("ecomlite_cart_v1").unwrap();
        assert_eq!(slot.read("ecomlite_cart_v1").unwrap(), None);

        // Removing twice is fine.
        slot.remove("ecomlite_cart_v1").unwrap();
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::open(dir.path()).unwrap();

        // A directory in the target's place makes the rename fail.
        fs::create_dir_all(dir.path().join("blocked.json/inner")).unwrap();

        assert!(slot.write("blocked", "{}").is_err());
        assert!(!dir.path().join("blocked.json.tmp").exists());
    }

    #[test]
    fn test_file_slot_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(slot.write(key, "x"), Err(StoreError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
        assert!(slot.write("AUTH_CONTEXT", "{}").is_ok());
    }

    #[test]
    fn test_memory_slot_quota() {
        let slot = MemorySlot::with_quota(20);

        slot.write("k", "0123456789").unwrap();
        let err = slot.write("k", &"x".repeat(40)).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { quota: 20, .. }));

        // Failed write keeps the old value.
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("0123456789"));
    }

    #[test]
    fn test_shared_slot_through_arc() {
        let slot = Arc::new(MemorySlot::new());
        let shared = Arc::clone(&slot);

        shared.write("k", "v").unwrap();
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("v"));
    }
}
