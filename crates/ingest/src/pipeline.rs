use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Days, NaiveDate, Utc};
use traffic_core::{Classifier, ClassifierConfig, Cursor, Fuse};
use traffic_db::TrafficStore;

use crate::accumulate::Accumulator;
use crate::paths::expand_log_paths;
use crate::source::{LogSource, StartAt};
use crate::types::{IngestError, IngestStats, MalformedLines, Result};

/// Receives the dates whose aggregates changed during a run.
pub trait ChangeSink {
    fn days_changed(&mut self, dates: &[NaiveDate]) -> Result<()>;
}

impl<F> ChangeSink for F
where
    F: FnMut(&[NaiveDate]) -> Result<()>,
{
    fn days_changed(&mut self, dates: &[NaiveDate]) -> Result<()> {
        self(dates)
    }
}

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Captured once per run; the day loop stops at the window containing it.
    pub now: DateTime<Utc>,
    pub malformed_lines: MalformedLines,
    pub classifier: ClassifierConfig,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            malformed_lines: MalformedLines::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Where the source should start reading for a given cursor.
///
/// Records sharing the cursor timestamp are skipped only as often as they
/// were already folded, so lines appended with that same timestamp still
/// count.
pub fn start_for_cursor(cursor: &Cursor) -> StartAt {
    if cursor.is_unset() {
        StartAt::Inclusive(cursor.last_timestamp)
    } else {
        StartAt::After {
            ts: cursor.last_timestamp,
            already_read: cursor.records_at_last_timestamp,
        }
    }
}

fn advance_cursor(cursor: &Cursor, last_ts: f64, ties: u64) -> Cursor {
    if last_ts == cursor.last_timestamp {
        Cursor::with_ties(last_ts, cursor.records_at_last_timestamp.saturating_add(ties))
    } else {
        Cursor::with_ties(last_ts, ties)
    }
}

pub fn day_of(ts: f64) -> Result<NaiveDate> {
    if !ts.is_finite() {
        return Err(IngestError::Timestamp(ts));
    }
    DateTime::<Utc>::from_timestamp(ts.floor() as i64, 0)
        .map(|value| value.date_naive())
        .ok_or(IngestError::Timestamp(ts))
}

pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| IngestError::Timestamp(day_start(date).timestamp() as f64))
}

/// Reads every log file under `log_paths` that is newer than the stored
/// cursor and folds it into the stored day aggregates.
pub fn ingest_logs<S>(
    store: &mut S,
    log_paths: &[PathBuf],
    options: &IngestOptions,
    sink: &mut dyn ChangeSink,
) -> Result<IngestStats>
where
    S: TrafficStore + ?Sized,
{
    let cursor = store.load_cursor()?;
    let (files, issues) = expand_log_paths(log_paths);
    let source = LogSource::from_paths(files, start_for_cursor(&cursor), options.malformed_lines);
    let mut stats = ingest_source(store, source, options, sink)?;
    let mut all_issues = issues;
    all_issues.append(&mut stats.issues);
    stats.issues = all_issues;
    Ok(stats)
}

/// Runs the day loop over an already opened source.
///
/// The source should start where [`start_for_cursor`] says; the cursor is
/// re-read here so a caller cannot pair a stale cursor with a fresh source.
pub fn ingest_source<S>(
    store: &mut S,
    mut source: LogSource,
    options: &IngestOptions,
    sink: &mut dyn ChangeSink,
) -> Result<IngestStats>
where
    S: TrafficStore + ?Sized,
{
    let run_start = Instant::now();
    let mut stats = IngestStats::default();
    let mut cursor = store.load_cursor()?;
    let accumulator = Accumulator::new(Classifier::new(&options.classifier));
    let now = options.now;

    let mut records = source.by_ref().peekable();

    if cursor.is_unset() {
        let first_ts = match records.peek() {
            None => None,
            Some(Ok(record)) => Some(record.ts),
            Some(Err(_)) => match records.next() {
                Some(Err(err)) => return Err(err),
                _ => None,
            },
        };
        let Some(first_ts) = first_ts else {
            drop(records);
            tracing::info!("log source is empty; nothing to ingest");
            collect_source_stats(&mut stats, &mut source);
            return Ok(stats);
        };
        tracing::info!(first_timestamp = first_ts, "bootstrapping cursor from first record");
        cursor = Cursor::new(first_ts);
        stats.bootstrapped = true;
    }

    let mut day = day_of(cursor.last_timestamp)?;
    while day_start(day) < now {
        let following = next_day(day)?;
        let end_exclusive = day_start(following).timestamp() as f64;

        let stored = store.load_day(day)?;
        let window = accumulator.accumulate(&mut records, end_exclusive)?;
        let mut fused = stored;
        fused.fuse_from(&window.aggregate);
        store.save_day(day, &fused)?;

        if let Some(last_ts) = window.last_timestamp {
            cursor = advance_cursor(&cursor, last_ts, window.records_at_last_timestamp);
            store.save_cursor(&cursor)?;
            stats.last_timestamp = Some(last_ts);
        }
        stats.records_ingested += window.records;
        stats.changed_dates.push(day);
        tracing::info!(
            date = %day,
            records = window.records,
            hits = fused.total_hits(),
            "collected day"
        );

        day = following;
    }
    drop(records);

    if !stats.changed_dates.is_empty() {
        sink.days_changed(&stats.changed_dates)?;
    }

    collect_source_stats(&mut stats, &mut source);
    tracing::debug!(
        days = stats.days_processed(),
        records = stats.records_ingested,
        malformed = stats.malformed_lines,
        last_timestamp = cursor.last_timestamp,
        elapsed_ms = run_start.elapsed().as_millis() as u64,
        "ingest finished"
    );
    Ok(stats)
}

fn collect_source_stats(stats: &mut IngestStats, source: &mut LogSource) {
    let source_stats = source.stats();
    stats.files_scanned = source_stats.files_scanned;
    stats.files_skipped = source_stats.files_skipped;
    stats.lines_read = source_stats.lines_read;
    stats.bytes_read = source_stats.bytes_read;
    stats.records_filtered = source_stats.records_filtered;
    stats.malformed_lines = source_stats.malformed_lines;
    stats.issues.extend(source.take_issues());
}
