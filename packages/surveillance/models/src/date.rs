//! Default time windows for upstream surveillance queries.
//!
//! Everything here is computed from an explicit `today` so callers decide
//! where the current date comes from.

use chrono::{Datelike as _, Months, NaiveDate};

/// Format used for every date sent to the surveillance service.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// First epidemiological week of the risk window.
pub const EPI_WEEK_START: u8 = 1;

/// Last epidemiological week of the risk window.
pub const EPI_WEEK_END: u8 = 50;

/// A one-year window ending on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Calendar year of `current_date`.
    pub current_year: i32,
    /// `current_year - 1`.
    pub last_year: i32,
    /// The day the window ends on.
    pub current_date: NaiveDate,
    /// Same month and day one year earlier.
    pub last_year_date: NaiveDate,
}

impl DateRange {
    /// Builds the window ending on `today`.
    ///
    /// 29 February maps to 28 February of the previous year.
    #[must_use]
    pub fn ending_on(today: NaiveDate) -> Self {
        let current_year = today.year();
        // Only overflows at chrono's minimum representable year.
        let last_year_date = today.checked_sub_months(Months::new(12)).unwrap_or(today);

        Self {
            current_year,
            last_year: current_year - 1,
            current_date: today,
            last_year_date,
        }
    }

    /// `current_date` as `YYYY-MM-DD`.
    #[must_use]
    pub fn current_date_param(&self) -> String {
        self.current_date.format(DATE_FORMAT).to_string()
    }

    /// `last_year_date` as `YYYY-MM-DD`.
    #[must_use]
    pub fn last_year_date_param(&self) -> String {
        self.last_year_date.format(DATE_FORMAT).to_string()
    }
}

/// Epidemiological-week range for per-municipality alert queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpiWeekWindow {
    /// First epidemiological week.
    pub ew_start: u8,
    /// Last epidemiological week.
    pub ew_end: u8,
    /// Year of `ew_start`.
    pub ey_start: i32,
    /// Year of `ew_end`.
    pub ey_end: i32,
}

impl EpiWeekWindow {
    /// Weeks 1-50 spanning last year through the current year.
    #[must_use]
    pub const fn trailing_year(range: &DateRange) -> Self {
        Self {
            ew_start: EPI_WEEK_START,
            ew_end: EPI_WEEK_END,
            ey_start: range.last_year,
            ey_end: range.current_year,
        }
    }
}
