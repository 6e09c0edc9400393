use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io;

/// What to do with a log line that is not a valid record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLines {
    /// Record an issue, count the line and keep reading.
    #[default]
    Skip,
    /// Fail the run on the first bad line.
    Abort,
}

/// Ingest summary returned after a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub lines_read: u64,
    pub bytes_read: u64,
    /// Records read but already covered by the cursor.
    pub records_filtered: u64,
    pub records_ingested: u64,
    pub malformed_lines: u64,
    pub bootstrapped: bool,
    pub changed_dates: Vec<NaiveDate>,
    pub last_timestamp: Option<f64>,
    pub issues: Vec<IngestIssue>,
}

impl IngestStats {
    pub fn days_processed(&self) -> usize {
        self.changed_dates.len()
    }
}

/// Non-fatal issues encountered during ingest.
#[derive(Debug, Clone, Serialize)]
pub struct IngestIssue {
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    pub message: String,
}

/// Errors emitted by the ingest pipeline.
#[derive(Debug)]
pub enum IngestError {
    Io(io::Error),
    Db(traffic_db::DbError),
    Parse {
        file_path: String,
        line: u64,
        source: serde_json::Error,
    },
    Timestamp(f64),
    Sink(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Db(err) => write!(f, "db error: {}", err),
            Self::Parse {
                file_path,
                line,
                source,
            } => write!(f, "malformed log line {}:{}: {}", file_path, line, source),
            Self::Timestamp(ts) => write!(f, "timestamp out of range: {}", ts),
            Self::Sink(message) => write!(f, "change sink failed: {}", message),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Parse { source, .. } => Some(source),
            Self::Timestamp(_) | Self::Sink(_) => None,
        }
    }
}

impl From<io::Error> for IngestError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<traffic_db::DbError> for IngestError {
    fn from(err: traffic_db::DbError) -> Self {
        Self::Db(err)
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
