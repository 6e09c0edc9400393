pub mod app;
pub mod config;
pub mod error;
pub mod reports;
pub mod services;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState};
pub use config::ReportParams;
pub use error::{AppError, Result};
pub use reports::{
    CategorySeries, DayReport, MonthReport, RankedCount, top_counts, top_statuses, top_user_agents,
    traffic_series,
};
pub use services::{AppServices, DEFAULT_TOP, IngestService, ReportService};
pub use startup::ensure_data_dir;
pub use traffic_db::StorageBackend;
pub use util::time::{month_bounds, parse_day, parse_month};
