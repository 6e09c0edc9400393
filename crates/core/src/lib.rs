mod classify;
mod fuse;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub use classify::{
    Classification, Classifier, ClassifierConfig, DEFAULT_BOT_SIGNATURES, DEFAULT_GOOGLE_MARKER,
    PATH_PLACEHOLDER, is_page, path_shape,
};
pub use fuse::{Fuse, fuse_all};

pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";
pub const USER_AGENT_HEADER: &str = "User-Agent";

/// One HTTP request event as written by the access log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub ts: f64,
    pub status: u16,
    pub duration: f64,
    pub request: RequestInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub remote_addr: String,
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,
}

impl LogRecord {
    fn first_header(&self, name: &str) -> Option<&str> {
        self.request
            .headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Raw user agent, empty when the header is absent.
    pub fn user_agent(&self) -> &str {
        self.first_header(USER_AGENT_HEADER).unwrap_or("")
    }

    /// Client address: first forwarded-for value, else the socket host.
    pub fn client_addr(&self) -> &str {
        match self.first_header(FORWARDED_FOR_HEADER) {
            Some(forwarded) if !forwarded.is_empty() => forwarded,
            _ => self
                .request
                .remote_addr
                .split(':')
                .next()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficCategory {
    Google,
    Bots,
    Users,
}

impl TrafficCategory {
    pub const ALL: [TrafficCategory; 3] = [Self::Google, Self::Bots, Self::Users];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Bots => "bots",
            Self::Users => "users",
        }
    }
}

impl std::fmt::Display for TrafficCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counter bundle tracked per traffic category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCounters {
    pub status: BTreeMap<String, u64>,
    pub path_types: BTreeMap<String, u64>,
    pub duration_ranges: BTreeMap<String, u64>,
    pub hits: u64,
    pub pages: u64,
}

impl CategoryCounters {
    pub fn record(&mut self, status: u16, path_shape: &str, duration: f64, is_page: bool) {
        bump(&mut self.status, status.to_string());
        bump(&mut self.path_types, path_shape.to_string());
        bump(&mut self.duration_ranges, duration_bucket(duration));
        self.hits = self.hits.saturating_add(1);
        if is_page {
            self.pages = self.pages.saturating_add(1);
        }
    }
}

/// Per-day traffic statistics. Month rollups share the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayAggregate {
    pub ua_tops: BTreeMap<String, u64>,
    pub google: CategoryCounters,
    pub bots: CategoryCounters,
    pub users: CategoryCounters,
}

impl DayAggregate {
    pub fn category(&self, category: TrafficCategory) -> &CategoryCounters {
        match category {
            TrafficCategory::Google => &self.google,
            TrafficCategory::Bots => &self.bots,
            TrafficCategory::Users => &self.users,
        }
    }

    pub fn category_mut(&mut self, category: TrafficCategory) -> &mut CategoryCounters {
        match category {
            TrafficCategory::Google => &mut self.google,
            TrafficCategory::Bots => &mut self.bots,
            TrafficCategory::Users => &mut self.users,
        }
    }

    pub fn record_user_agent(&mut self, user_agent: &str) {
        bump(&mut self.ua_tops, user_agent.to_string());
    }

    pub fn total_hits(&self) -> u64 {
        TrafficCategory::ALL
            .iter()
            .map(|category| self.category(*category).hits)
            .fold(0u64, u64::saturating_add)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Watermark of the last record folded into a persisted day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default)]
    pub last_timestamp: f64,
    /// How many folded records carry exactly `last_timestamp`.
    #[serde(default)]
    pub records_at_last_timestamp: u64,
}

impl Cursor {
    pub fn new(last_timestamp: f64) -> Self {
        Self {
            last_timestamp,
            records_at_last_timestamp: 0,
        }
    }

    pub fn with_ties(last_timestamp: f64, records_at_last_timestamp: u64) -> Self {
        Self {
            last_timestamp,
            records_at_last_timestamp,
        }
    }

    /// Timestamps below one second mean no run has completed yet.
    pub fn is_unset(&self) -> bool {
        self.last_timestamp < 1.0
    }
}

/// Request duration rounded to one decimal place.
pub fn duration_bucket(duration: f64) -> String {
    format!("{:.1}", duration)
}

fn bump(counter: &mut BTreeMap<String, u64>, key: String) {
    let slot = counter.entry(key).or_insert(0);
    *slot = slot.saturating_add(1);
}
