//! Clock injection and period logic for date-driven behavior
//!
//! "Today" is supplied through a trait so overdue detection and period
//! summaries are testable against a fixed date.

use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;
use tradebook_config::TimeRange;

/// Clock reference type
pub type ClockRef = Arc<dyn Clock>;

/// Source of the current date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Fixed clock for tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Period context for filtering records by date range
#[derive(Debug, Clone, PartialEq)]
pub struct TimeContext {
    /// Current time range
    pub range: TimeRange,
    /// Custom start date (when range is Custom)
    pub custom_start: Option<NaiveDate>,
    /// Custom end date (when range is Custom)
    pub custom_end: Option<NaiveDate>,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self {
            range: TimeRange::Month,
            custom_start: None,
            custom_end: None,
        }
    }
}

impl TimeContext {
    /// Create a new time context
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            custom_start: None,
            custom_end: None,
        }
    }

    /// Create with custom date range
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            range: TimeRange::Custom,
            custom_start: Some(start),
            custom_end: Some(end),
        }
    }

    /// Get the effective start date based on range
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.range {
            TimeRange::Month => Some(today.with_day(1).unwrap_or(today)),
            TimeRange::Quarter => {
                let quarter_start = ((today.month0() / 3) * 3) + 1;
                NaiveDate::from_ymd_opt(today.year(), quarter_start, 1)
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            TimeRange::All => None,
            TimeRange::Custom => self.custom_start,
        }
    }

    /// Get the effective end date based on range
    pub fn end_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.range {
            TimeRange::Month => {
                let next_month = if today.month() == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
                };
                next_month.and_then(|d| d.pred_opt()).or(Some(today))
            }
            TimeRange::Quarter => {
                let quarter_end = ((today.month0() / 3) + 1) * 3;
                let next = if quarter_end == 12 {
                    NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(today.year(), quarter_end + 1, 1)
                };
                next.and_then(|d| d.pred_opt()).or(Some(today))
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 12, 31),
            TimeRange::All => None,
            TimeRange::Custom => self.custom_end,
        }
    }

    /// Check if a date is within the period
    pub fn contains(&self, today: NaiveDate, date: &NaiveDate) -> bool {
        let start = self.start_date(today);
        let end = self.end_date(today);

        match (start, end) {
            (None, None) => true,
            (Some(s), None) => *date >= s,
            (None, Some(e)) => *date <= e,
            (Some(s), Some(e)) => *date >= s && *date <= e,
        }
    }

    /// Get a human-readable description of the time range
    pub fn description(&self) -> String {
        match self.range {
            TimeRange::Month => "Current Month".to_string(),
            TimeRange::Quarter => "Current Quarter".to_string(),
            TimeRange::Year => "Current Year".to_string(),
            TimeRange::All => "All Time".to_string(),
            TimeRange::Custom => {
                if let (Some(start), Some(end)) = (self.custom_start, self.custom_end) {
                    format!("{} to {}", start, end)
                } else {
                    "Custom Range".to_string()
                }
            }
        }
    }
}

// ==================== Tests ====================
