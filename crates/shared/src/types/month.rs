//! Calendar month keys.
//!
//! Agent ledger openings and month-end closings are partitioned by
//! calendar month. A `Month` is canonically the first day of the month,
//! so it can serve as a map key and order naturally.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a [`Month`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonthError {
    /// The year/month pair does not form a valid calendar month.
    #[error("Invalid calendar month: {year}-{month:02}")]
    Invalid {
        /// The rejected year.
        year: i32,
        /// The rejected month number.
        month: u32,
    },

    /// Month arithmetic left the representable date range.
    #[error("Month out of representable range")]
    OutOfRange,
}

/// A calendar month, keyed by its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Month(NaiveDate);

impl Month {
    /// Creates a month from a year and 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns `MonthError::Invalid` for month numbers outside 1-12 or
    /// years outside chrono's range.
    pub fn from_ymd(year: i32, month: u32) -> Result<Self, MonthError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(MonthError::Invalid { year, month })
    }

    /// The month containing the given date.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .unwrap_or(self.0)
    }

    /// The following month.
    ///
    /// # Errors
    ///
    /// Returns `MonthError::OutOfRange` at the end of chrono's date range.
    pub fn next(self) -> Result<Self, MonthError> {
        self.0
            .checked_add_months(Months::new(1))
            .map(Self)
            .ok_or(MonthError::OutOfRange)
    }

    /// Returns true if the date falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.0.year() && date.month() == self.0.month()
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}
