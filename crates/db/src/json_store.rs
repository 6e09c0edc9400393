use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde::de::DeserializeOwned;
use traffic_core::{Cursor, DayAggregate};

use crate::error::{DbError, Result};
use crate::store::{AggregateStore, CursorStore};

pub const CURSOR_FILE_NAME: &str = "parser_data.json";

/// One pretty-printed JSON file per day under `<root>/YYYY/MM/DD.json`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn month_dir(&self, year: i32, month: u32) -> PathBuf {
        self.root
            .join(format!("{:04}", year))
            .join(format!("{:02}", month))
    }

    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.month_dir(date.year(), date.month())
            .join(format!("{:02}.json", date.day()))
    }

    pub fn cursor_path(&self) -> PathBuf {
        self.root.join(CURSOR_FILE_NAME)
    }
}

fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(DbError::io(path, err)),
    }
}

/// Writes through a sibling temp file so readers never see a torn file.
fn write_json_atomic<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| DbError::io(parent, err))?;
    }
    // Going through `Value` sorts object keys at every level.
    let value = serde_json::to_value(value)?;
    let mut bytes = serde_json::to_vec_pretty(&value)?;
    bytes.push(b'\n');

    let tmp_path = path.with_extension("json.tmp");
    let mut file = File::create(&tmp_path).map_err(|err| DbError::io(&tmp_path, err))?;
    file.write_all(&bytes)
        .and_then(|_| file.sync_all())
        .map_err(|err| DbError::io(&tmp_path, err))?;
    fs::rename(&tmp_path, path).map_err(|err| DbError::io(path, err))?;
    Ok(())
}

impl AggregateStore for JsonStore {
    fn load_day(&self, date: NaiveDate) -> Result<DayAggregate> {
        read_json_or_default(&self.day_path(date))
    }

    fn save_day(&mut self, date: NaiveDate, aggregate: &DayAggregate) -> Result<()> {
        let path = self.day_path(date);
        write_json_atomic(&path, aggregate)?;
        tracing::debug!(
            %date,
            path = %path.display(),
            hits = aggregate.total_hits(),
            "saved day aggregate"
        );
        Ok(())
    }
}

impl CursorStore for JsonStore {
    fn load_cursor(&self) -> Result<Cursor> {
        read_json_or_default(&self.cursor_path())
    }

    fn save_cursor(&mut self, cursor: &Cursor) -> Result<()> {
        write_json_atomic(&self.cursor_path(), cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_path_uses_zero_padded_layout() {
        let store = JsonStore::new("/data");
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).expect("date");
        assert_eq!(store.day_path(date), PathBuf::from("/data/2024/03/07.json"));
        assert_eq!(store.cursor_path(), PathBuf::from("/data/parser_data.json"));
    }

    #[test]
    fn saved_day_has_sorted_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonStore::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).expect("date");
        let mut day = DayAggregate::default();
        day.users.record(200, "/", 0.1, true);
        store.save_day(date, &day).expect("save");

        let contents = fs::read_to_string(store.day_path(date)).expect("read");
        let bots = contents.find("\"bots\"").expect("bots key");
        let google = contents.find("\"google\"").expect("google key");
        let ua_tops = contents.find("\"ua_tops\"").expect("ua_tops key");
        let users = contents.find("\"users\"").expect("users key");
        assert!(bots < google && google < ua_tops && ua_tops < users);
        assert!(!store.day_path(date).with_extension("json.tmp").exists());
    }
}
