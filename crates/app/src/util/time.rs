use chrono::{Datelike, Months, NaiveDate};

use crate::error::{AppError, Result};

/// Parses `YYYY-MM`.
pub fn parse_month(value: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|err| AppError::InvalidInput(format!("invalid month {}: {}", value, err)))?;
    Ok((first.year(), first.month()))
}

/// Parses `YYYY-MM-DD`.
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| AppError::InvalidInput(format!("invalid date {}: {}", value, err)))
}

/// First and last day of a month, with the last day capped at `today`.
pub fn month_bounds(year: i32, month: u32, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid month {}-{}", year, month)))?;
    if first > today {
        return Err(AppError::InvalidInput(format!(
            "month {}-{:02} has not started yet",
            year, month
        )));
    }
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| AppError::InvalidInput(format!("invalid month {}-{}", year, month)))?;
    Ok((first, last.min(today)))
}
