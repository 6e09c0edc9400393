//! Ranked and per-day views over stored aggregates.
//!
//! Aggregates stay unordered counters everywhere else; sorting happens here,
//! right before something is shown to a person.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use traffic_core::{DayAggregate, Fuse, TrafficCategory};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub key: String,
    pub count: u64,
}

/// Largest counts first; ties broken by key so output is stable.
pub fn top_counts(counts: &BTreeMap<String, u64>, limit: usize) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = counts
        .iter()
        .map(|(key, count)| RankedCount {
            key: key.clone(),
            count: *count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    ranked.truncate(limit);
    ranked
}

pub fn top_user_agents(aggregate: &DayAggregate, limit: usize) -> Vec<RankedCount> {
    top_counts(&aggregate.ua_tops, limit)
}

/// Most common status codes across all categories.
pub fn top_statuses(aggregate: &DayAggregate, limit: usize) -> Vec<RankedCount> {
    let mut merged: BTreeMap<String, u64> = BTreeMap::new();
    for category in TrafficCategory::ALL {
        merged.fuse_from(&aggregate.category(category).status);
    }
    top_counts(&merged, limit)
}

/// Pages per day for one category, in date order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySeries {
    pub category: TrafficCategory,
    /// Bot traffic is kept but hidden from charts by default.
    pub visible: bool,
    pub pages: Vec<u64>,
}

pub fn traffic_series(days: &[(NaiveDate, DayAggregate)]) -> Vec<CategorySeries> {
    TrafficCategory::ALL
        .into_iter()
        .map(|category| CategorySeries {
            category,
            visible: category != TrafficCategory::Bots,
            pages: days
                .iter()
                .map(|(_, aggregate)| aggregate.category(category).pages)
                .collect(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub aggregate: DayAggregate,
    pub top_user_agents: Vec<RankedCount>,
    pub top_statuses: Vec<RankedCount>,
}

impl DayReport {
    pub fn new(date: NaiveDate, aggregate: DayAggregate, top: usize) -> Self {
        Self {
            date,
            top_user_agents: top_user_agents(&aggregate, top),
            top_statuses: top_statuses(&aggregate, top),
            aggregate,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthReport {
    pub year: i32,
    pub month: u32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub aggregate: DayAggregate,
    pub series: Vec<CategorySeries>,
    pub top_user_agents: Vec<RankedCount>,
    pub top_statuses: Vec<RankedCount>,
}

impl MonthReport {
    pub fn summary_line(&self) -> String {
        format!(
            "{}-{:02}: {} hits, {} user pages, {} google pages, {} bot hits",
            self.year,
            self.month,
            self.aggregate.total_hits(),
            self.aggregate.users.pages,
            self.aggregate.google.pages,
            self.aggregate.bots.hits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs
            .iter()
            .map(|(key, count)| (key.to_string(), *count))
            .collect()
    }

    #[test]
    fn top_counts_rank_by_count_then_key() {
        let ranked = top_counts(&counts(&[("b", 2), ("a", 2), ("c", 5), ("d", 1)]), 3);
        let keys: Vec<&str> = ranked.iter().map(|item| item.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        assert_eq!(ranked[0].count, 5);
    }

    #[test]
    fn top_statuses_merge_categories() {
        let mut day = DayAggregate::default();
        day.users.status = counts(&[("200", 3), ("404", 1)]);
        day.bots.status = counts(&[("404", 4)]);
        day.google.status = counts(&[("200", 1)]);
        let ranked = top_statuses(&day, 10);
        assert_eq!(
            ranked,
            vec![
                RankedCount { key: "404".to_string(), count: 5 },
                RankedCount { key: "200".to_string(), count: 4 },
            ]
        );
    }

    #[test]
    fn series_follow_day_order_and_hide_bots() {
        let first = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        let second = NaiveDate::from_ymd_opt(2024, 3, 2).expect("date");
        let mut a = DayAggregate::default();
        a.users.pages = 4;
        let mut b = DayAggregate::default();
        b.users.pages = 7;
        b.bots.pages = 2;

        let series = traffic_series(&[(first, a), (second, b)]);
        assert_eq!(series.len(), 3);
        let users = series
            .iter()
            .find(|item| item.category == TrafficCategory::Users)
            .expect("users");
        assert_eq!(users.pages, vec![4, 7]);
        let bots = series
            .iter()
            .find(|item| item.category == TrafficCategory::Bots)
            .expect("bots");
        assert!(!bots.visible);
        assert_eq!(bots.pages, vec![0, 2]);
    }
}
