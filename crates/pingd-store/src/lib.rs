//! # pingd Store
//!
//! Backends for the [`Store`] protocol:
//!
//! - [`MemoryStore`]: process-local maps, lost on restart
//! - [`SqliteStore`]: SQLite file (or in-memory database) via `tokio-rusqlite`
//!
//! [`Store`]: pingd_protocols::Store

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
