//! Month → week partitioning.
//!
//! Weeks run Monday to Sunday. A month is split into the calendar weeks that
//! touch it, each clipped to the month's own first and last day, so the
//! slices tile the month exactly with no gap and no overlap.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::error::PeriodError;
use crate::period::{self, Period, YearMonth};

/// A month has at most six Monday-start rows.
const MAX_WEEKS_PER_MONTH: usize = 6;

/// One week of a month, clipped to the month's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSlice {
    /// 1-based, chronological.
    pub ordinal: u32,
    pub effective_start: NaiveDate,
    pub effective_end: NaiveDate,
}

impl WeekSlice {
    /// "Week 1 (Feb 1 - 4)"
    pub fn label(&self) -> String {
        format!(
            "Week {} ({} - {})",
            self.ordinal,
            period::short_day(self.effective_start),
            self.effective_end.format("%-d")
        )
    }

    /// The week period this slice drills down to.
    pub fn period(&self) -> Result<Period, PeriodError> {
        Period::week(self.effective_start, self.effective_end)
    }
}

/// Partition `(year, month)` into clipped Monday-start weeks.
pub fn weeks_in_month(year: i32, month: u32) -> Result<Vec<WeekSlice>, PeriodError> {
    YearMonth::new(year, month).map(weeks_of)
}

/// Partition an already-validated month.
pub fn weeks_of(month: YearMonth) -> Vec<WeekSlice> {
    let month_start = month.first_day();
    let month_end = month.last_day();

    let mut weeks = Vec::with_capacity(MAX_WEEKS_PER_MONTH);
    let mut cursor = monday_on_or_before(month_start);
    let mut ordinal = 1;

    while cursor <= month_end {
        let natural_end = cursor.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        weeks.push(WeekSlice {
            ordinal,
            effective_start: cursor.max(month_start),
            effective_end: natural_end.min(month_end),
        });

        cursor = match cursor.checked_add_days(Days::new(7)) {
            Some(next) => next,
            None => break,
        };
        ordinal += 1;
    }

    weeks
}

/// Start of the Monday-start calendar week containing `date`.
///
/// Near the lower calendar limit the week is clipped to `NaiveDate::MIN`.
pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
}

/// The natural Monday–Sunday week containing `date`, unclipped.
pub fn natural_week(date: NaiveDate) -> Result<Period, PeriodError> {
    let start = monday_on_or_before(date);
    let end = start
        .checked_add_days(Days::new(6))
        .ok_or(PeriodError::OutOfRange)?;
    Period::week(start, end)
}

/// The natural week `offset` weeks away from the week containing `date`.
pub fn shift_week(date: NaiveDate, offset: i64) -> Result<Period, PeriodError> {
    let days = offset
        .unsigned_abs()
        .checked_mul(7)
        .map(Days::new)
        .ok_or(PeriodError::OutOfRange)?;
    let anchor = if offset >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
    .ok_or(PeriodError::OutOfRange)?;
    natural_week(anchor)
}
