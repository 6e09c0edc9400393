use chrono::{Datelike, NaiveDate};
use traffic_core::fuse_all;

use crate::error::Result;
use crate::reports::{DayReport, MonthReport, top_statuses, top_user_agents, traffic_series};
use crate::services::{SharedConfig, open_store};
use crate::util::time::month_bounds;

pub const DEFAULT_TOP: usize = 10;

#[derive(Clone)]
pub struct ReportService {
    config: SharedConfig,
}

impl ReportService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn day(&self, date: NaiveDate, top: usize) -> Result<DayReport> {
        let store = open_store(&self.config)?;
        let aggregate = store.load_day(date)?;
        Ok(DayReport::new(date, aggregate, top))
    }

    /// Fuses every stored day of the month up to and including `today`.
    pub fn month(&self, year: i32, month: u32, today: NaiveDate, top: usize) -> Result<MonthReport> {
        let (first_day, last_day) = month_bounds(year, month, today)?;
        let store = open_store(&self.config)?;
        let days = store.load_days(first_day, last_day)?;
        let aggregate = fuse_all(days.iter().map(|(_, day)| day));
        tracing::debug!(year, month, days = days.len(), "month rollup");
        Ok(MonthReport {
            year,
            month,
            first_day,
            last_day,
            series: traffic_series(&days),
            top_user_agents: top_user_agents(&aggregate, top),
            top_statuses: top_statuses(&aggregate, top),
            aggregate,
        })
    }

    /// One report per distinct month touched by `dates`, in order.
    pub fn months_for(
        &self,
        dates: &[NaiveDate],
        today: NaiveDate,
        top: usize,
    ) -> Result<Vec<MonthReport>> {
        let mut months: Vec<(i32, u32)> = dates
            .iter()
            .map(|date| (date.year(), date.month()))
            .collect();
        months.sort_unstable();
        months.dedup();
        months
            .into_iter()
            .map(|(year, month)| self.month(year, month, today, top))
            .collect()
    }
}
