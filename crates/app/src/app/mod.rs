use std::path::PathBuf;

use ingest::{ChangeSink, IngestStats, MalformedLines};
use serde::{Deserialize, Serialize};
use traffic_core::ClassifierConfig;
use traffic_db::StorageBackend;

use crate::error::{AppError, Result};
use crate::services::AppServices;
use crate::startup::ensure_data_dir;

/// Where logs come from, where aggregates go, and how requests are judged.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    pub log_paths: Vec<PathBuf>,
    pub malformed_lines: MalformedLines,
    pub classifier: ClassifierConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("local"),
            storage: StorageBackend::default(),
            log_paths: ingest::default_log_paths(),
            malformed_lines: MalformedLines::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Application state shared by frontends.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn initialize(&self) -> Result<()> {
        ensure_data_dir(&self.config)
            .map_err(|err| AppError::Message(format!("initialize data dir: {}", err)))?;
        if self.config.log_paths.is_empty() {
            return Err(AppError::InvalidInput("no log paths configured".to_string()));
        }
        Ok(())
    }

    pub fn refresh_data(&self, sink: &mut dyn ChangeSink) -> Result<IngestStats> {
        self.services.ingest.run(sink)
    }
}
