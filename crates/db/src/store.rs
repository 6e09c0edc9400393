use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use traffic_core::{Cursor, DayAggregate};

use crate::Db;
use crate::error::Result;
use crate::json_store::JsonStore;

pub const SQLITE_FILE_NAME: &str = "traffic.sqlite";

/// Durable per-day aggregate persistence.
pub trait AggregateStore {
    /// Returns the zero aggregate when nothing was stored for `date`.
    fn load_day(&self, date: NaiveDate) -> Result<DayAggregate>;

    /// Overwrites whatever was stored for `date`. Callers fuse first.
    fn save_day(&mut self, date: NaiveDate, aggregate: &DayAggregate) -> Result<()>;

    /// Loads every day in `from..=to`, in date order.
    fn load_days(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<(NaiveDate, DayAggregate)>> {
        from.iter_days()
            .take_while(|date| *date <= to)
            .map(|date| Ok((date, self.load_day(date)?)))
            .collect()
    }
}

/// Persistence for the ingest watermark.
pub trait CursorStore {
    fn load_cursor(&self) -> Result<Cursor>;
    fn save_cursor(&mut self, cursor: &Cursor) -> Result<()>;
}

pub trait TrafficStore: AggregateStore + CursorStore {}

impl<T> TrafficStore for T where T: AggregateStore + CursorStore + ?Sized {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

/// Opens the configured backend rooted at `data_dir`.
pub fn open_store(backend: StorageBackend, data_dir: &Path) -> Result<Box<dyn TrafficStore>> {
    match backend {
        StorageBackend::Json => Ok(Box::new(JsonStore::new(data_dir))),
        StorageBackend::Sqlite => {
            std::fs::create_dir_all(data_dir)
                .map_err(|err| crate::DbError::io(data_dir, err))?;
            let mut db = Db::open(data_dir.join(SQLITE_FILE_NAME))?;
            db.migrate()?;
            Ok(Box::new(db))
        }
    }
}
