//! Snapshot stores
//!
//! Implementations of the core persistence port: a JSON file per snapshot
//! for real sessions and an in-memory store for tests and dry runs.

use labkit_core::{SnapshotStore, StoreError};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

/// Stores one snapshot as pretty-printed JSON in a file
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> SnapshotStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<T>, StoreError> {
        if !self.path.exists() {
            debug!("No snapshot at {}", self.path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Err(StoreError::Corrupted(format!(
                "{} is empty",
                self.path.display()
            )));
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&self.path, json)?;
        debug!("Wrote snapshot to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the snapshot in memory
#[derive(Debug)]
pub struct MemoryStore<T> {
    value: Mutex<Option<T>>,
    saves: AtomicUsize,
    fail_writes: AtomicBool,
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            saves: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Store pre-populated with `value`
    pub fn with_value(value: T) -> Self {
        let store = Self::new();
        *store.value.lock() = Some(value);
        store
    }

    /// Current stored value
    pub fn snapshot(&self) -> Option<T> {
        self.value.lock().clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail with an I/O error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnapshotStore<T> for MemoryStore<T>
where
    T: Clone + Send,
{
    fn load(&self) -> Result<Option<T>, StoreError> {
        Ok(self.value.lock().clone())
    }

    fn save(&self, value: &T) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("writes disabled")));
        }
        *self.value.lock() = Some(value.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
