mod support;

use chrono::NaiveDate;
use support::setup_state;
use traffic_app::{AppConfig, AppError, AppState};
use traffic_core::TrafficCategory;
use traffic_db::StorageBackend;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("date")
}

#[test]
fn ingest_then_month_report() {
    for storage in [StorageBackend::Json, StorageBackend::Sqlite] {
        let (_dir, state) = setup_state(storage);
        let mut changed = Vec::new();
        let mut sink = |dates: &[NaiveDate]| -> ingest::Result<()> {
            changed.extend_from_slice(dates);
            Ok(())
        };
        let stats = state.refresh_data(&mut sink).expect("refresh");
        assert_eq!(stats.records_ingested, 5);
        assert!(stats.bootstrapped);
        assert_eq!(changed.first(), Some(&date(3, 10)));

        let report = state
            .services
            .reports
            .month(2024, 3, date(3, 31), 5)
            .expect("month");
        assert_eq!(report.first_day, date(3, 1));
        assert_eq!(report.last_day, date(3, 31));
        assert_eq!(report.aggregate.total_hits(), 5);
        assert_eq!(report.aggregate.google.pages, 1);
        assert_eq!(report.aggregate.bots.status.get("404"), Some(&1));
        assert_eq!(report.aggregate.users.hits, 3);
        assert_eq!(report.aggregate.users.pages, 2);
        assert_eq!(report.top_user_agents[0].key, "Mozilla/5.0");
        assert_eq!(report.top_user_agents[0].count, 3);

        let users = report
            .series
            .iter()
            .find(|series| series.category == TrafficCategory::Users)
            .expect("users series");
        assert_eq!(users.pages.len(), 31);
        assert_eq!(users.pages[9], 1);
        assert_eq!(users.pages[10], 1);
    }
}

#[test]
fn second_refresh_adds_nothing() {
    let (_dir, state) = setup_state(StorageBackend::Json);
    let mut sink = |_dates: &[NaiveDate]| -> ingest::Result<()> { Ok(()) };
    state.refresh_data(&mut sink).expect("first refresh");
    let stats = state.refresh_data(&mut sink).expect("second refresh");
    assert_eq!(stats.records_ingested, 0);
    assert!(!stats.bootstrapped);

    let report = state
        .services
        .reports
        .day(date(3, 10), 3)
        .expect("day report");
    assert_eq!(report.aggregate.total_hits(), 3);
}

#[test]
fn months_for_groups_changed_dates() {
    let (_dir, state) = setup_state(StorageBackend::Json);
    let reports = state
        .services
        .reports
        .months_for(&[date(3, 11), date(3, 10), date(4, 1)], date(4, 2), 3)
        .expect("months");
    let months: Vec<(i32, u32)> = reports.iter().map(|item| (item.year, item.month)).collect();
    assert_eq!(months, vec![(2024, 3), (2024, 4)]);
    assert_eq!(reports[1].last_day, date(4, 2));
}

#[test]
fn future_month_is_rejected() {
    let (_dir, state) = setup_state(StorageBackend::Json);
    let err = state
        .services
        .reports
        .month(2024, 5, date(4, 2), 3)
        .expect_err("future month");
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[test]
fn initialize_requires_log_paths() {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = AppState::new(AppConfig {
        data_dir: dir.path().join("data"),
        log_paths: Vec::new(),
        ..AppConfig::default()
    });
    assert!(matches!(state.initialize(), Err(AppError::InvalidInput(_))));
}
