//! Local cache implementations.
//!
//! `JsonFileCache` is the production cache: a single JSON file holding the
//! whole multi-user blob `{userId: document}`. Writing one user's document
//! re-serializes and rewrites the entire blob, matching the persistence
//! granularity of the stored format. `MemoryCache` is the injectable fake
//! for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashmap::DashMap;

use crate::domain::{LocalCache, StorageError};
use crate::models::document::UserDocument;

/// Fixed name of the cache blob file inside the data directory.
pub const STORAGE_FILE_NAME: &str = "intentional-week-data.json";

pub struct JsonFileCache {
    path: PathBuf,
    // One writer at a time within this process; concurrent processes are
    // last-write-wins, same as the remote store.
    lock: Mutex<()>,
}

impl JsonFileCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORAGE_FILE_NAME),
            lock: Mutex::new(()),
        }
    }

    fn read_blob(&self) -> Result<BTreeMap<String, UserDocument>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_blob(&self, blob: &BTreeMap<String, UserDocument>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(blob)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl LocalCache for JsonFileCache {
    fn get(&self, user_id: &str) -> Result<Option<UserDocument>, StorageError> {
        let _guard = self.lock.lock().expect("cache lock poisoned");
        Ok(self.read_blob()?.remove(user_id))
    }

    fn put(&self, user_id: &str, document: &UserDocument) -> Result<(), StorageError> {
        let _guard = self.lock.lock().expect("cache lock poisoned");
        let mut blob = self.read_blob()?;
        blob.insert(user_id.to_string(), document.clone());
        self.write_blob(&blob)
    }

    fn remove(&self, user_id: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().expect("cache lock poisoned");
        let mut blob = self.read_blob()?;
        if blob.remove(user_id).is_some() {
            self.write_blob(&blob)?;
        }
        Ok(())
    }
}

/// In-memory cache, one entry per user.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, UserDocument>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, user_id: &str) -> Result<Option<UserDocument>, StorageError> {
        Ok(self.entries.get(user_id).map(|entry| entry.clone()))
    }

    fn put(&self, user_id: &str, document: &UserDocument) -> Result<(), StorageError> {
        self.entries.insert(user_id.to_string(), document.clone());
        Ok(())
    }

    fn remove(&self, user_id: &str) -> Result<(), StorageError> {
        self.entries.remove(user_id);
        Ok(())
    }
}
