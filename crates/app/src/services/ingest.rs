use chrono::Utc;
use ingest::{ChangeSink, IngestOptions, IngestStats};

use crate::error::Result;
use crate::services::{SharedConfig, open_store};

#[derive(Clone)]
pub struct IngestService {
    config: SharedConfig,
}

impl IngestService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, sink: &mut dyn ChangeSink) -> Result<IngestStats> {
        let mut store = open_store(&self.config)?;
        let options = IngestOptions {
            now: Utc::now(),
            malformed_lines: self.config.malformed_lines,
            classifier: self.config.classifier.clone(),
        };
        let stats = ingest::ingest_logs(store.as_mut(), &self.config.log_paths, &options, sink)?;
        for issue in &stats.issues {
            tracing::warn!(
                path = %issue.file_path,
                line = issue.line,
                "{}",
                issue.message
            );
        }
        tracing::info!(
            days = stats.days_processed(),
            records = stats.records_ingested,
            malformed = stats.malformed_lines,
            bootstrapped = stats.bootstrapped,
            "ingest run complete"
        );
        Ok(stats)
    }
}
