mod aggregates;
mod error;
mod json_store;
mod migrations;
mod store;

use std::path::Path;

use rusqlite::Connection;

pub use error::{DbError, Result};
pub use json_store::JsonStore;
pub use store::{AggregateStore, CursorStore, StorageBackend, TrafficStore, open_store};

/// SQLite-backed day aggregate and cursor storage.
pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        Ok(Self { conn })
    }
}
