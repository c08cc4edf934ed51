//! SQLite store.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;
use tracing::debug;

use pingd_protocols::{Store, StoreError};

use crate::schema::init_schema;

/// Store backed by a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::init(conn).await
    }

    /// Open (or create) a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Unavailable(format!("{}: {}", parent.display(), e)))?;
        }

        debug!("Opening SQLite store at {}", path.display());
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(backend_error)?;
        Ok(Self { conn })
    }
}

fn backend_error(e: tokio_rusqlite::Error) -> StoreError {
    match e {
        tokio_rusqlite::Error::ConnectionClosed => StoreError::Unavailable(e.to_string()),
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let key = key.to_string();
        let value = value.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO records (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, value],
                )?;
                Ok(())
            })
            .await
            .map_err(backend_error)
    }

    async fn get(&self, key: &str) -> Result<String, StoreError> {
        let key = key.to_string();
        let lookup = key.clone();
        let value = self
            .conn
            .call(move |conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM records WHERE key = ?1",
                        [&lookup],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await
            .map_err(backend_error)?;

        value.ok_or(StoreError::NotFound(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM records WHERE key = ?1", [&key])?;
                Ok(())
            })
            .await
            .map_err(backend_error)
    }

    async fn get_set(&self, set_name: &str) -> Result<HashSet<String>, StoreError> {
        let set_name = set_name.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT member FROM set_members WHERE set_name = ?1")?;
                let members = stmt
                    .query_map([&set_name], |row| row.get::<_, String>(0))?
                    .collect::<Result<HashSet<_>, _>>()?;
                Ok(members)
            })
            .await
            .map_err(backend_error)
    }

    async fn add_to_set(&self, set_name: &str, keys: &[String]) -> Result<(), StoreError> {
        let set_name = set_name.to_string();
        let keys = keys.to_vec();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for key in &keys {
                    tx.execute(
                        "INSERT OR IGNORE INTO set_members (set_name, member) VALUES (?1, ?2)",
                        params![set_name, key],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(backend_error)
    }

    async fn remove_from_set(&self, set_name: &str, keys: &[String]) -> Result<(), StoreError> {
        let set_name = set_name.to_string();
        let keys = keys.to_vec();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for key in &keys {
                    tx.execute(
                        "DELETE FROM set_members WHERE set_name = ?1 AND member = ?2",
                        params![set_name, key],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(backend_error)
    }

    async fn delete_set(&self, set_name: &str) -> Result<(), StoreError> {
        let set_name = set_name.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM set_members WHERE set_name = ?1", [&set_name])?;
                Ok(())
            })
            .await
            .map_err(backend_error)
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
