//! Database schema management.

use rusqlite::Connection;
use tokio_rusqlite::Error;

/// Initialize the database schema.
pub fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
-- Encrypted job records, keyed by job id
CREATE TABLE IF NOT EXISTS records (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Named sets of keys
CREATE TABLE IF NOT EXISTS set_members (
    set_name TEXT NOT NULL,
    member TEXT NOT NULL,
    PRIMARY KEY (set_name, member)
);
"#;
