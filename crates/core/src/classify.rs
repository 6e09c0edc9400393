use serde::{Deserialize, Serialize};

use crate::{LogRecord, TrafficCategory};

pub const DEFAULT_GOOGLE_MARKER: &str = "google";
pub const DEFAULT_BOT_SIGNATURES: &[&str] =
    &["curl", "bot", "statping", "spider", "crawler", "bing", "http"];
pub const PATH_PLACEHOLDER: &str = "<pk>";

const STATIC_PREFIX: &str = "/static";
const ASSET_MARKER: &str = "assets";
const ASSET_SHAPE: &str = "*asset*";

/// User-agent heuristics used to split traffic into categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub google_marker: String,
    pub bot_signatures: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            google_marker: DEFAULT_GOOGLE_MARKER.to_string(),
            bot_signatures: DEFAULT_BOT_SIGNATURES
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: TrafficCategory,
    pub path_shape: String,
    pub is_page: bool,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    google_marker: String,
    bot_signatures: Vec<String>,
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        // Matching is case-insensitive, so signatures are lowered once here.
        Self {
            google_marker: config.google_marker.to_lowercase(),
            bot_signatures: config
                .bot_signatures
                .iter()
                .filter(|signature| !signature.is_empty())
                .map(|signature| signature.to_lowercase())
                .collect(),
        }
    }

    pub fn category(&self, user_agent: &str) -> TrafficCategory {
        let user_agent = user_agent.to_lowercase();
        if !self.google_marker.is_empty() && user_agent.contains(&self.google_marker) {
            return TrafficCategory::Google;
        }
        if self
            .bot_signatures
            .iter()
            .any(|signature| user_agent.contains(signature.as_str()))
        {
            return TrafficCategory::Bots;
        }
        TrafficCategory::Users
    }

    pub fn classify(&self, record: &LogRecord) -> Classification {
        let uri = record.request.uri.as_str();
        Classification {
            category: self.category(record.user_agent()),
            path_shape: path_shape(uri),
            is_page: is_page(uri),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

pub fn path_shape(uri: &str) -> String {
    if uri.starts_with(STATIC_PREFIX) {
        return STATIC_PREFIX.to_string();
    }
    if uri.contains(ASSET_MARKER) {
        return ASSET_SHAPE.to_string();
    }
    uri.split('/')
        .map(|segment| {
            let segment = segment
                .split_once('?')
                .map_or(segment, |(head, _query)| head);
            if !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit()) {
                PATH_PLACEHOLDER
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Extensionless paths count as page views.
pub fn is_page(uri: &str) -> bool {
    !uri.contains('.')
}
