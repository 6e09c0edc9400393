mod accumulate;
mod paths;
mod pipeline;
mod source;
mod types;

pub use accumulate::{Accumulator, Window};
pub use paths::{LOG_PATHS_ENV, default_log_paths, expand_log_paths};
pub use pipeline::{
    ChangeSink, IngestOptions, day_of, day_start, ingest_logs, ingest_source, start_for_cursor,
};
pub use source::{LogSource, SourceStats, StartAt, parse_log_line};
pub use types::{IngestError, IngestIssue, IngestStats, MalformedLines, Result};
