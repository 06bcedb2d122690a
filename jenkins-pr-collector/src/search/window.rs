//! Month-bounded search windows over an inclusive date range.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Calendar date format used on the command line and in search qualifiers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A contiguous span of calendar days, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl Window {
    /// GitHub search qualifier selecting items created inside the window.
    #[must_use]
    pub fn created_qualifier(&self) -> String {
        format!("created:{self}")
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// The requested collection period.
///
/// The end date is inclusive: internally it is extended to `23:59:59` of that
/// day before partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    /// Builds the range `[start 00:00:00, end 23:59:59]`.
    #[must_use]
    pub fn inclusive(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_time(NaiveTime::MIN),
            end: end
                .and_hms_opt(23, 59, 59)
                .unwrap_or_else(|| end.and_time(NaiveTime::MIN)),
        }
    }

    /// First day of the range.
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last day of the range.
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    /// Returns true if the range contains no day.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Splits the range into consecutive calendar-month windows.
    ///
    /// Each window starts the day after the previous one ended and stops at
    /// the last day of its month or at the range end, whichever comes first.
    #[must_use]
    pub fn windows(&self) -> Vec<Window> {
        let mut windows = Vec::new();
        let mut cursor = self.start;

        while cursor < self.end {
            let Some(month_end) = last_day_of_month(cursor.date()) else {
                break;
            };
            let window_end = month_end.and_time(NaiveTime::MIN).min(self.end);
            windows.push(Window {
                start: cursor.date(),
                end: window_end.date(),
            });

            let Some(next) = window_end.checked_add_days(Days::new(1)) else {
                break;
            };
            cursor = next;
        }

        windows
    }
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}
