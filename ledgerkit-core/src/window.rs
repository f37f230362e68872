//! Month windows: the 12 calendar months a balance report covers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of months in a report window.
pub const WINDOW_LEN: usize = 12;

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("month must be in 1..=12, got {0}")]
    InvalidMonth(u32),
    #[error("no calendar date for {year}-{month:02}-01")]
    OutOfRange { year: i32, month: u32 },
}

/// One (month, year) slot of a report window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthWindowEntry {
    /// Calendar month, 1..=12
    pub month: u32,
    pub year: i32,
}

impl MonthWindowEntry {
    pub fn new(month: u32, year: i32) -> Result<Self, WindowError> {
        if !(1..=12).contains(&month) {
            return Err(WindowError::InvalidMonth(month));
        }
        Ok(Self { month, year })
    }

    /// Three-letter month label ("Jan".."Dec").
    pub fn abbrev(&self) -> &'static str {
        MONTH_ABBREVS[(self.month - 1) as usize]
    }

    /// Half-open range covering the whole month. December ends on January 1st of the next year.
    pub fn date_range(&self) -> Result<DateRange, WindowError> {
        let begin = first_of(self.year, self.month)?;
        let end = if self.month == 12 {
            first_of(self.year + 1, 1)?
        } else {
            first_of(self.year, self.month + 1)?
        };
        Ok(DateRange { begin, end })
    }
}

/// `[begin, end)` date range handed to the ledger tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Ledger-style date (YYYY/MM/DD) of the inclusive start.
    pub fn begin_arg(&self) -> String {
        self.begin.format("%Y/%m/%d").to_string()
    }

    /// Ledger-style date (YYYY/MM/DD) of the exclusive end.
    pub fn end_arg(&self) -> String {
        self.end.format("%Y/%m/%d").to_string()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.begin_arg(), self.end_arg())
    }
}

fn first_of(year: i32, month: u32) -> Result<NaiveDate, WindowError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(WindowError::OutOfRange { year, month })
}

/// Enumerate the 12 months ending at `month`/`year`, newest first.
///
/// Months that fall before January belong to the previous year. When `year`
/// is `None` the year of `today` is used.
pub fn collect_window(
    month: u32,
    year: Option<i32>,
    today: NaiveDate,
) -> Result<Vec<MonthWindowEntry>, WindowError> {
    if !(1..=12).contains(&month) {
        return Err(WindowError::InvalidMonth(month));
    }
    let anchor_year = year.unwrap_or_else(|| today.year());

    let mut out = Vec::with_capacity(WINDOW_LEN);
    for offset in 0..WINDOW_LEN as i32 {
        let m = month as i32 - offset;
        let entry = if m < 1 {
            MonthWindowEntry {
                month: (m + 12) as u32,
                year: anchor_year - 1,
            }
        } else {
            MonthWindowEntry {
                month: m as u32,
                year: anchor_year,
            }
        };
        out.push(entry);
    }
    Ok(out)
}

/// Rolling window: the 12 months ending with the month of `today`.
pub fn trailing_window(today: NaiveDate) -> Result<Vec<MonthWindowEntry>, WindowError> {
    collect_window(today.month(), Some(today.year()), today)
}

/// Fiscal window: January..December of `year`.
pub fn fiscal_window(year: i32, today: NaiveDate) -> Result<Vec<MonthWindowEntry>, WindowError> {
    collect_window(12, Some(year), today)
}
