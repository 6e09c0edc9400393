mod support;

use support::{BACKENDS, date, make_day, setup_store};
use traffic_core::{Cursor, DayAggregate};
use traffic_db::{Db, StorageBackend, open_store};

#[test]
fn missing_day_loads_as_zero_aggregate() {
    for backend in BACKENDS {
        let test = setup_store(backend);
        let day = test.store.load_day(date(2024, 1, 1)).expect("load");
        assert_eq!(day, DayAggregate::default(), "{:?}", backend);
    }
}

#[test]
fn save_day_overwrites_previous_content() {
    for backend in BACKENDS {
        let mut test = setup_store(backend);
        let target = date(2024, 1, 2);
        test.store.save_day(target, &make_day(5)).expect("save");
        test.store.save_day(target, &make_day(1)).expect("save again");
        let loaded = test.store.load_day(target).expect("load");
        assert_eq!(loaded, make_day(1), "{:?}", backend);
        assert_eq!(loaded.users.hits, 1);
    }
}

#[test]
fn saved_day_survives_reopen() {
    for backend in BACKENDS {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = date(2024, 2, 29);
        {
            let mut store = open_store(backend, dir.path()).expect("open");
            store.save_day(target, &make_day(3)).expect("save");
            store
                .save_cursor(&Cursor::with_ties(1_709_164_800.5, 2))
                .expect("cursor");
        }
        let store = open_store(backend, dir.path()).expect("reopen");
        assert_eq!(store.load_day(target).expect("load"), make_day(3));
        assert_eq!(
            store.load_cursor().expect("cursor"),
            Cursor::with_ties(1_709_164_800.5, 2)
        );
    }
}

#[test]
fn cursor_defaults_to_never_run() {
    for backend in BACKENDS {
        let test = setup_store(backend);
        let cursor = test.store.load_cursor().expect("cursor");
        assert!(cursor.is_unset(), "{:?}", backend);
        assert_eq!(cursor.last_timestamp, 0.0);
    }
}

#[test]
fn load_days_returns_every_date_in_range() {
    let mut test = setup_store(StorageBackend::Json);
    test.store
        .save_day(date(2024, 3, 2), &make_day(2))
        .expect("save");
    let days = test
        .store
        .load_days(date(2024, 3, 1), date(2024, 3, 3))
        .expect("load days");
    let dates = days.iter().map(|(day, _)| *day).collect::<Vec<_>>();
    assert_eq!(
        dates,
        vec![date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)]
    );
    assert!(days[0].1.is_empty());
    assert_eq!(days[1].1.users.hits, 2);
}

#[test]
fn json_cursor_file_has_expected_shape() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = open_store(StorageBackend::Json, dir.path()).expect("open");
    store.save_cursor(&Cursor::new(1_700_000_000.25)).expect("save");
    let contents =
        std::fs::read_to_string(dir.path().join("parser_data.json")).expect("read cursor");
    let value: serde_json::Value = serde_json::from_str(&contents).expect("json");
    assert_eq!(value["last_timestamp"], 1_700_000_000.25);
}

#[test]
fn migrate_is_idempotent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut db = Db::open(dir.path().join("traffic.sqlite")).expect("open");
    db.migrate().expect("migrate");
    db.migrate().expect("migrate again");
    assert!(db.has_table("day_aggregate").expect("table"));
    assert!(db.has_table("ingest_cursor").expect("table"));
}
