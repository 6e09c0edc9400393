mod ingest;
mod reports;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::Result;
use traffic_db::TrafficStore;

pub use ingest::IngestService;
pub use reports::{DEFAULT_TOP, ReportService};

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub ingest: IngestService,
    pub reports: ReportService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            ingest: IngestService::new(shared.clone()),
            reports: ReportService::new(shared),
        }
    }
}

fn open_store(config: &SharedConfig) -> Result<Box<dyn TrafficStore>> {
    Ok(traffic_db::open_store(config.storage, &config.data_dir)?)
}
