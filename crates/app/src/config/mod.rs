use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::DEFAULT_TOP;
use crate::util::time::{parse_day, parse_month};

/// Report selection as given on the command line.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ReportParams {
    pub month: Option<String>,
    pub day: Option<String>,
    pub top: Option<usize>,
}

impl ReportParams {
    pub fn top_limit(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }

    pub fn parsed_month(&self) -> Result<Option<(i32, u32)>> {
        self.month.as_deref().map(parse_month).transpose()
    }

    pub fn parsed_day(&self) -> Result<Option<NaiveDate>> {
        self.day.as_deref().map(parse_day).transpose()
    }
}
