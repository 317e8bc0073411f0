use anyhow::{Context, Result};
use rusqlite::Connection;
use std::time::Duration;

use super::schema;

/// Background loaders open their own connection to the same file, so writers
/// wait this long for a lock instead of failing with SQLITE_BUSY.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The local store: one SQLite connection plus the path it came from.
pub struct Database {
    conn: Connection,
    path: String,
}

impl Database {
    /// Open or create the file at `path` (`:memory:` works too) with foreign
    /// key enforcement on. The schema is left untouched.
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path))?;
        conn.pragma_update(None, "foreign_keys", true)
            .context("Failed to enable foreign keys")?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("Failed to set busy timeout")?;

        Ok(Self {
            conn,
            path: path.to_owned(),
        })
    }

    pub fn open_initialized(path: &str) -> Result<Self> {
        let db = Self::new(path)?;
        db.initialize_schema()?;
        Ok(db)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Create missing tables and apply column upgrades. Safe to repeat.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(&self.conn)
    }
}
