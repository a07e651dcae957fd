//! In-memory key-value store

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use super::{KeyValueStore, StoreResult};
use crate::error::StoreError;

type Entries = BTreeMap<(String, String), Value>;

/// Volatile store backed by an ordered map
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Entries>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all groups
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Entries>> {
        self.entries
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Entries>> {
        self.entries
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, group: &str, key: &str, value: Value) -> StoreResult<()> {
        self.write()?
            .insert((group.to_string(), key.to_string()), value);
        Ok(())
    }

    fn get(&self, group: &str, key: &str) -> StoreResult<Option<Value>> {
        Ok(self
            .read()?
            .get(&(group.to_string(), key.to_string()))
            .cloned())
    }

    fn delete(&self, group: &str, key: &str) -> StoreResult<bool> {
        Ok(self
            .write()?
            .remove(&(group.to_string(), key.to_string()))
            .is_some())
    }

    fn get_group(&self, group: &str) -> StoreResult<Vec<Value>> {
        let entries = self.read()?;
        Ok(entries
            .iter()
            .filter(|((g, _), _)| g == group)
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn rename(
        &self,
        group: &str,
        from_key: &str,
        to_key: &str,
        value: Value,
    ) -> StoreResult<()> {
        let mut entries = self.write()?;
        entries.remove(&(group.to_string(), from_key.to_string()));
        entries.insert((group.to_string(), to_key.to_string()), value);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
