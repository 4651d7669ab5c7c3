//! Calendar periods: weeks, months and arbitrary ranges.
//!
//! All dates are wall-clock calendar dates (`NaiveDate`); nothing here knows
//! about instants or timezones. "Today" is always passed in by the caller.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PeriodError;

/// Canonical date format used in URLs and fetch requests.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// What a period was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Week,
    Month,
    Range,
}

/// A closed, inclusive date interval with a display label.
///
/// `start <= end` is enforced by every constructor; there is no way to build
/// or mutate a `Period` into an inverted state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
    label: String,
    kind: PeriodKind,
}

impl Period {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        label: impl Into<String>,
        kind: PeriodKind,
    ) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::Inverted {
                start: format_iso(start),
                end: format_iso(end),
            });
        }
        Ok(Self {
            start,
            end,
            label: label.into(),
            kind,
        })
    }

    /// A week period, labelled with its date span.
    pub fn week(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        Self::new(start, end, span_label(start, end), PeriodKind::Week)
    }

    /// A custom range, labelled with its date span.
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        Self::new(start, end, span_label(start, end), PeriodKind::Range)
    }

    /// The whole of a calendar month.
    pub fn month(month: YearMonth) -> Self {
        Self {
            start: month.first_day(),
            end: month.last_day(),
            label: month.label(),
            kind: PeriodKind::Month,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn day_count(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// The month containing this period's start date.
    pub fn start_month(&self) -> YearMonth {
        YearMonth::from_date(self.start)
    }
}

/// A validated `(year, month)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self::from_date)
            .ok_or(PeriodError::InvalidMonth { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first + Days::new(u64::from(self.day_count() - 1))
    }

    pub fn day_count(&self) -> u32 {
        match self.first.month() {
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(self.first.year()) => 29,
            2 => 28,
            _ => 31,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The month `n` months earlier, or `None` past the supported calendar.
    pub fn sub_months(&self, n: u32) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(n))
            .map(Self::from_date)
    }

    /// The month `n` months later, or `None` past the supported calendar.
    pub fn add_months(&self, n: u32) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(n))
            .map(Self::from_date)
    }

    /// "February 2024"
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// "Feb 2024"
    pub fn short_label(&self) -> String {
        self.first.format("%b %Y").to_string()
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Format a date as `yyyy-MM-dd`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse a strict `yyyy-MM-dd` date. Round-trips with [`format_iso`].
pub fn parse_iso(value: &str) -> Result<NaiveDate, PeriodError> {
    let trimmed = value.trim();
    if trimmed.len() != 10 {
        return Err(PeriodError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map_err(|_| PeriodError::InvalidDate(value.to_string()))
}

/// `[start of the month `months` before `reference`, reference]`.
pub fn default_lookback(reference: NaiveDate, months: u32) -> Result<Period, PeriodError> {
    let start = YearMonth::from_date(reference)
        .sub_months(months)
        .ok_or(PeriodError::OutOfRange)?
        .first_day();
    Period::new(start, reference, lookback_label(months), PeriodKind::Range)
}

/// "Last 6 months"
pub fn lookback_label(months: u32) -> String {
    match months {
        1 => "Last month".to_string(),
        n => format!("Last {} months", n),
    }
}

/// "Feb 1, 2024 to Feb 4, 2024"
pub fn span_label(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} to {}", long_day(start), long_day(end))
}

/// "Feb 1, 2024"
pub fn long_day(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Feb 1"
pub fn short_day(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_format_iso_pads_month_and_day() {
        assert_eq!(format_iso(d(2024, 2, 1)), "2024-02-01");
        assert_eq!(format_iso(d(2023, 12, 31)), "2023-12-31");
    }

    #[test]
    fn test_parse_iso_round_trips() {
        for date in [d(2024, 2, 29), d(2000, 1, 1), d(1999, 12, 31)] {
            assert_eq!(parse_iso(&format_iso(date)).unwrap(), date);
        }
    }

    #[test]
    fn test_parse_iso_rejects_loose_formats() {
        assert!(parse_iso("2024-2-1").is_err());
        assert!(parse_iso("2024-02-30").is_err());
        assert!(parse_iso("").is_err());
        assert!(parse_iso("02/01/2024").is_err());
    }

    #[test]
    fn test_period_rejects_inverted() {
        let err = Period::range(d(2024, 3, 2), d(2024, 3, 1)).unwrap_err();
        assert_eq!(
            err,
            PeriodError::Inverted {
                start: "2024-03-02".to_string(),
                end: "2024-03-01".to_string(),
            }
        );
    }

    #[test]
    fn test_single_day_period_allowed() {
        let p = Period::range(d(2024, 3, 1), d(2024, 3, 1)).unwrap();
        assert_eq!(p.day_count(), 1);
        assert_eq!(p.label(), "Mar 1, 2024 to Mar 1, 2024");
    }

    #[test]
    fn test_month_period_bounds() {
        let feb = Period::month(YearMonth::new(2024, 2).unwrap());
        assert_eq!(feb.start(), d(2024, 2, 1));
        assert_eq!(feb.end(), d(2024, 2, 29));
        assert_eq!(feb.label(), "February 2024");
        assert_eq!(feb.kind(), PeriodKind::Month);

        let feb_2023 = YearMonth::new(2023, 2).unwrap();
        assert_eq!(feb_2023.last_day(), d(2023, 2, 28));
        assert_eq!(YearMonth::new(2024, 12).unwrap().last_day(), d(2024, 12, 31));
        assert_eq!(YearMonth::new(2024, 4).unwrap().last_day(), d(2024, 4, 30));
    }

    #[test]
    fn test_year_month_rejects_bad_month() {
        assert!(YearMonth::new(2024, 0).is_err());
        assert!(YearMonth::new(2024, 13).is_err());
    }

    #[test]
    fn test_year_month_sub_months_crosses_year() {
        let jan = YearMonth::new(2024, 1).unwrap();
        let aug = jan.sub_months(5).unwrap();
        assert_eq!((aug.year(), aug.month()), (2023, 8));
        assert_eq!(aug.short_label(), "Aug 2023");
    }

    #[test]
    fn test_default_lookback_starts_on_first_of_month() {
        let p = default_lookback(d(2024, 8, 31), 6).unwrap();
        assert_eq!(p.start(), d(2024, 2, 1));
        assert_eq!(p.end(), d(2024, 8, 31));
        assert_eq!(p.label(), "Last 6 months");
    }

    #[test]
    fn test_default_lookback_zero_months_is_current_month() {
        let p = default_lookback(d(2024, 8, 15), 0).unwrap();
        assert_eq!(p.start(), d(2024, 8, 1));
    }

    #[test]
    fn test_period_serializes_iso_dates() {
        let p = Period::week(d(2024, 2, 1), d(2024, 2, 4)).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["start"], "2024-02-01");
        assert_eq!(json["end"], "2024-02-04");
        assert_eq!(json["kind"], "week");
    }
}
