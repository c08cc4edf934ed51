//! Store protocol definitions.
//!
//! A store keeps the encrypted job records (plain key-value) and named sets
//! of keys, such as the index of jobs that should be scheduled.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::StoreError;

/// Durable key-value and keyed-set storage.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert or overwrite a value.
    async fn insert(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Fetch a value. An absent key is [`StoreError::NotFound`].
    async fn get(&self, key: &str) -> Result<String, StoreError>;

    /// Delete a value. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Members of a named set. A missing set is empty.
    async fn get_set(&self, set_name: &str) -> Result<HashSet<String>, StoreError>;

    /// Add members to a named set.
    async fn add_to_set(&self, set_name: &str, keys: &[String]) -> Result<(), StoreError>;

    /// Remove members from a named set.
    async fn remove_from_set(&self, set_name: &str, keys: &[String]) -> Result<(), StoreError>;

    /// Drop a named set entirely.
    async fn delete_set(&self, set_name: &str) -> Result<(), StoreError>;
}
