mod args;
mod config;

use std::io;

use chrono::{NaiveDate, Utc};
use traffic_app::{AppState, ReportParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    init_logging();

    let file = config::resolve_config_path(args.config.as_deref());
    let loaded = config::load_or_create(&file).map_err(io::Error::other)?;
    if loaded.created {
        println!("Created config at {}.", loaded.file.display());
    }

    let state = AppState::new(loaded.config);
    state.initialize()?;
    tracing::info!(
        data_dir = %state.config.data_dir.display(),
        storage = ?state.config.storage,
        "using data dir"
    );

    if !args.no_ingest {
        let reports = state.services.reports.clone();
        let top = args.report.top_limit();
        let mut rerender = |dates: &[NaiveDate]| -> ingest::Result<()> {
            let today = Utc::now().date_naive();
            let months = reports
                .months_for(dates, today, top)
                .map_err(|err| ingest::IngestError::Sink(err.to_string()))?;
            for month in months {
                println!("{}", month.summary_line());
            }
            Ok(())
        };
        let stats = state.refresh_data(&mut rerender)?;
        println!(
            "Ingested {} records across {} days ({} malformed lines skipped).",
            stats.records_ingested,
            stats.days_processed(),
            stats.malformed_lines
        );
    }

    print_reports(&state, &args.report)?;
    Ok(())
}

fn print_reports(state: &AppState, params: &ReportParams) -> Result<(), Box<dyn std::error::Error>> {
    let top = params.top_limit();
    if let Some((year, month)) = params.parsed_month()? {
        let today = Utc::now().date_naive();
        let report = state.services.reports.month(year, month, today, top)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if let Some(date) = params.parsed_day()? {
        let report = state.services.reports.day(date, top)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}
