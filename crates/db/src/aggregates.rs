use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::{OptionalExtension, params};
use traffic_core::{Cursor, DayAggregate};

use crate::Db;
use crate::error::Result;
use crate::store::{AggregateStore, CursorStore};

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl AggregateStore for Db {
    fn load_day(&self, date: NaiveDate) -> Result<DayAggregate> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM day_aggregate WHERE day = ?1",
                params![day_key(date)],
                |row| row.get(0),
            )
            .optional()?;
        match data {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(DayAggregate::default()),
        }
    }

    fn save_day(&mut self, date: NaiveDate, aggregate: &DayAggregate) -> Result<()> {
        let data = serde_json::to_string(aggregate)?;
        self.conn.execute(
            r#"
            INSERT INTO day_aggregate (day, data, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(day) DO UPDATE SET
              data = excluded.data,
              updated_at = excluded.updated_at
            "#,
            params![day_key(date), data, now_rfc3339()],
        )?;
        tracing::debug!(%date, hits = aggregate.total_hits(), "saved day aggregate");
        Ok(())
    }
}

impl CursorStore for Db {
    fn load_cursor(&self) -> Result<Cursor> {
        let cursor = self
            .conn
            .query_row(
                "SELECT last_timestamp, records_at_last_timestamp FROM ingest_cursor WHERE id = 1",
                [],
                |row| Ok(Cursor::with_ties(row.get(0)?, row.get::<_, i64>(1)? as u64)),
            )
            .optional()?;
        Ok(cursor.unwrap_or_default())
    }

    fn save_cursor(&mut self, cursor: &Cursor) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO ingest_cursor (id, last_timestamp, records_at_last_timestamp, updated_at)
            VALUES (1, ?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
              last_timestamp = excluded.last_timestamp,
              records_at_last_timestamp = excluded.records_at_last_timestamp,
              updated_at = excluded.updated_at
            "#,
            params![
                cursor.last_timestamp,
                cursor.records_at_last_timestamp as i64,
                now_rfc3339()
            ],
        )?;
        Ok(())
    }
}
