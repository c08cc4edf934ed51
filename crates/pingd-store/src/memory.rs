//! In-memory store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use pingd_protocols::{Store, StoreError};

/// Store backed by process-local maps. Contents are lost on restart.
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
    sets: RwLock<HashMap<String, HashSet<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            sets: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, StoreError> {
        let records = self.records.read().await;
        records
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.remove(key);
        Ok(())
    }

    async fn get_set(&self, set_name: &str) -> Result<HashSet<String>, StoreError> {
        let sets = self.sets.read().await;
        Ok(sets.get(set_name).cloned().unwrap_or_default())
    }

    async fn add_to_set(&self, set_name: &str, keys: &[String]) -> Result<(), StoreError> {
        let mut sets = self.sets.write().await;
        sets.entry(set_name.to_string())
            .or_default()
            .extend(keys.iter().cloned());
        Ok(())
    }

    async fn remove_from_set(&self, set_name: &str, keys: &[String]) -> Result<(), StoreError> {
        let mut sets = self.sets.write().await;
        if let Some(set) = sets.get_mut(set_name) {
            for key in keys {
                set.remove(key);
            }
            if set.is_empty() {
                sets.remove(set_name);
            }
        }
        Ok(())
    }

    async fn delete_set(&self, set_name: &str) -> Result<(), StoreError> {
        let mut sets = self.sets.write().await;
        sets.remove(set_name);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
