#![allow(dead_code)]

use chrono::NaiveDate;
use tempfile::TempDir;
use traffic_core::DayAggregate;
use traffic_db::{StorageBackend, TrafficStore, open_store};

pub struct TestStore {
    pub _dir: TempDir,
    pub store: Box<dyn TrafficStore>,
}

pub fn setup_store(backend: StorageBackend) -> TestStore {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = open_store(backend, dir.path()).expect("open store");
    TestStore { _dir: dir, store }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn make_day(hits: u64) -> DayAggregate {
    let mut day = DayAggregate::default();
    for _ in 0..hits {
        day.users.record(200, "/", 0.1, true);
        day.record_user_agent("Mozilla/5.0");
    }
    day.bots.record(404, "/x", 0.0, true);
    day.record_user_agent("curl/7.68.0");
    day
}

pub const BACKENDS: [StorageBackend; 2] = [StorageBackend::Json, StorageBackend::Sqlite];
