//! Two-click date range picker over a month grid.
//!
//! Phases: `Empty` → `AnchorSet` → `Complete` → (next click) `AnchorSet`.
//! Clicking before the anchor moves the anchor instead of inverting the
//! range, so a `Complete` selection always satisfies `anchor <= end`.
//! Month navigation only moves the visible month; it never touches the
//! selection. Dropping the selector discards it without side effects.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::partition::monday_on_or_before;
use crate::period::{self, Period, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionPhase {
    Empty,
    AnchorSet,
    Complete,
}

/// How a grid cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DayCellKind {
    /// Padding day from an adjacent month; dimmed and not clickable.
    OutsideMonth,
    /// The anchor or the end date.
    Terminal,
    /// Strictly between anchor and end of a complete selection.
    Interior,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub kind: DayCellKind,
}

impl DayCell {
    pub fn is_selectable(&self) -> bool {
        self.kind != DayCellKind::OutsideMonth
    }
}

/// Header row of the grid, Monday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelector {
    phase: SelectionPhase,
    anchor: Option<NaiveDate>,
    end: Option<NaiveDate>,
    visible_month: YearMonth,
}

impl RangeSelector {
    /// Open the picker on the month containing `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            phase: SelectionPhase::Empty,
            anchor: None,
            end: None,
            visible_month: YearMonth::from_date(today),
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn anchor(&self) -> Option<NaiveDate> {
        self.anchor
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn visible_month(&self) -> YearMonth {
        self.visible_month
    }

    /// Apply a click on `date`. Clicks outside the visible month are ignored
    /// and return false.
    pub fn click_day(&mut self, date: NaiveDate) -> bool {
        if !self.visible_month.contains(date) {
            log::debug!("RangeSelector: ignored click on outside-month day {}", date);
            return false;
        }

        match (self.phase, self.anchor) {
            (SelectionPhase::AnchorSet, Some(anchor)) if date < anchor => {
                self.anchor = Some(date);
            }
            (SelectionPhase::AnchorSet, Some(_)) => {
                self.end = Some(date);
                self.phase = SelectionPhase::Complete;
            }
            _ => {
                self.anchor = Some(date);
                self.end = None;
                self.phase = SelectionPhase::AnchorSet;
            }
        }
        true
    }

    pub fn prev_month(&mut self) {
        if let Some(month) = self.visible_month.sub_months(1) {
            self.visible_month = month;
        }
    }

    pub fn next_month(&mut self) {
        if let Some(month) = self.visible_month.add_months(1) {
            self.visible_month = month;
        }
    }

    pub fn clear(&mut self) {
        self.phase = SelectionPhase::Empty;
        self.anchor = None;
        self.end = None;
    }

    /// Whether the clear control is shown.
    pub fn has_selection(&self) -> bool {
        self.phase != SelectionPhase::Empty
    }

    pub fn can_confirm(&self) -> bool {
        self.phase == SelectionPhase::Complete
    }

    /// Emit the selected range, or `None` while the selection is incomplete.
    pub fn confirm(&self) -> Option<Period> {
        match (self.phase, self.anchor, self.end) {
            (SelectionPhase::Complete, Some(start), Some(end)) => Period::range(start, end).ok(),
            _ => None,
        }
    }

    pub fn classify(&self, date: NaiveDate) -> DayCellKind {
        if !self.visible_month.contains(date) {
            return DayCellKind::OutsideMonth;
        }
        if Some(date) == self.anchor || Some(date) == self.end {
            return DayCellKind::Terminal;
        }
        match (self.phase, self.anchor, self.end) {
            (SelectionPhase::Complete, Some(start), Some(end)) if start < date && date < end => {
                DayCellKind::Interior
            }
            _ => DayCellKind::Plain,
        }
    }

    /// Whole Monday–Sunday rows from the week of the 1st to the week of the
    /// last day of the visible month.
    pub fn grid(&self) -> Vec<[DayCell; 7]> {
        let last = self.visible_month.last_day();
        let mut rows = Vec::with_capacity(6);
        let mut row_start = monday_on_or_before(self.visible_month.first_day());

        while row_start <= last {
            let mut row = [DayCell {
                date: row_start,
                kind: DayCellKind::OutsideMonth,
            }; 7];
            for (offset, cell) in row.iter_mut().enumerate() {
                let date = row_start
                    .checked_add_days(Days::new(offset as u64))
                    .unwrap_or(NaiveDate::MAX);
                *cell = DayCell {
                    date,
                    kind: self.classify(date),
                };
            }
            rows.push(row);

            row_start = match row_start.checked_add_days(Days::new(7)) {
                Some(next) => next,
                None => break,
            };
        }
        rows
    }

    /// "Select start date" / "Select end date" / "Feb 1, 2024 to Feb 4, 2024"
    pub fn status_text(&self) -> String {
        match (self.anchor, self.end) {
            (Some(start), Some(end)) => period::span_label(start, end),
            (Some(_), None) => "Select end date".to_string(),
            _ => "Select start date".to_string(),
        }
    }

    /// Label of the confirm button.
    pub fn confirm_label(&self) -> String {
        match (self.anchor, self.end) {
            (Some(start), Some(end)) => format!(
                "Get work from {} to {}",
                period::short_day(start),
                period::short_day(end)
            ),
            _ => "Get work from X to Y".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn picker() -> RangeSelector {
        RangeSelector::new(d(2024, 3, 15))
    }

    #[test]
    fn test_two_ascending_clicks_complete() {
        let mut sel = picker();
        sel.click_day(d(2024, 3, 5));
        sel.click_day(d(2024, 3, 12));
        assert_eq!(sel.phase(), SelectionPhase::Complete);
        assert_eq!(sel.anchor(), Some(d(2024, 3, 5)));
        assert_eq!(sel.end(), Some(d(2024, 3, 12)));
    }

    #[test]
    fn test_click_before_anchor_moves_anchor() {
        let mut sel = picker();
        sel.click_day(d(2024, 3, 12));
        sel.click_day(d(2024, 3, 5));
        assert_eq!(sel.phase(), SelectionPhase::AnchorSet);
        assert_eq!(sel.anchor(), Some(d(2024, 3, 5)));
        assert_eq!(sel.end(), None);
    }

    #[test]
    fn test_third_click_restarts() {
        let mut sel = picker();
        sel.click_day(d(2024, 3, 5));
        sel.click_day(d(2024, 3, 12));
        sel.click_day(d(2024, 3, 20));
        assert_eq!(sel.phase(), SelectionPhase::AnchorSet);
        assert_eq!(sel.anchor(), Some(d(2024, 3, 20)));
        assert_eq!(sel.end(), None);
    }

    #[test]
    fn test_same_day_twice_is_single_day_range() {
        let mut sel = picker();
        sel.click_day(d(2024, 3, 5));
        sel.click_day(d(2024, 3, 5));
        assert_eq!(sel.phase(), SelectionPhase::Complete);
        let period = sel.confirm().unwrap();
        assert_eq!(period.start(), period.end());
    }

    #[test]
    fn test_month_navigation_keeps_selection() {
        let mut sel = picker();
        sel.click_day(d(2024, 3, 28));
        sel.next_month();
        assert_eq!(sel.visible_month(), YearMonth::new(2024, 4).unwrap());
        assert_eq!(sel.anchor(), Some(d(2024, 3, 28)));
        sel.click_day(d(2024, 4, 3));
        assert_eq!(sel.phase(), SelectionPhase::Complete);
        let period = sel.confirm().unwrap();
        assert_eq!(period.start(), d(2024, 3, 28));
        assert_eq!(period.end(), d(2024, 4, 3));
        assert_eq!(period.kind(), PeriodKind::Range);
    }

    #[test]
    fn test_prev_month_crosses_year() {
        let mut sel = RangeSelector::new(d(2024, 1, 10));
        sel.prev_month();
        assert_eq!(sel.visible_month(), YearMonth::new(2023, 12).unwrap());
    }

    #[test]
    fn test_outside_month_click_ignored() {
        let mut sel = picker();
        assert!(!sel.click_day(d(2024, 2, 28)));
        assert_eq!(sel.phase(), SelectionPhase::Empty);
    }

    #[test]
    fn test_clear_resets_from_any_phase() {
        let mut sel = picker();
        sel.click_day(d(2024, 3, 5));
        sel.click_day(d(2024, 3, 6));
        sel.clear();
        assert_eq!(sel.phase(), SelectionPhase::Empty);
        assert_eq!(sel.anchor(), None);
        assert_eq!(sel.end(), None);
        assert!(!sel.has_selection());
    }

    #[test]
    fn test_confirm_disabled_until_complete() {
        let mut sel = picker();
        assert!(sel.confirm().is_none());
        sel.click_day(d(2024, 3, 5));
        assert!(!sel.can_confirm());
        assert!(sel.confirm().is_none());
        assert_eq!(sel.confirm_label(), "Get work from X to Y");
        assert_eq!(sel.status_text(), "Select end date");
    }

    #[test]
    fn test_labels_for_complete_selection() {
        let mut sel = picker();
        assert_eq!(sel.status_text(), "Select start date");
        sel.click_day(d(2024, 3, 1));
        sel.click_day(d(2024, 3, 4));
        assert_eq!(sel.status_text(), "Mar 1, 2024 to Mar 4, 2024");
        assert_eq!(sel.confirm_label(), "Get work from Mar 1 to Mar 4");
    }

    #[test]
    fn test_classification() {
        let mut sel = picker();
        sel.click_day(d(2024, 3, 5));
        // Interior only shows once the range is complete
        assert_eq!(sel.classify(d(2024, 3, 6)), DayCellKind::Plain);
        assert_eq!(sel.classify(d(2024, 3, 5)), DayCellKind::Terminal);

        sel.click_day(d(2024, 3, 8));
        assert_eq!(sel.classify(d(2024, 3, 5)), DayCellKind::Terminal);
        assert_eq!(sel.classify(d(2024, 3, 6)), DayCellKind::Interior);
        assert_eq!(sel.classify(d(2024, 3, 8)), DayCellKind::Terminal);
        assert_eq!(sel.classify(d(2024, 3, 9)), DayCellKind::Plain);
        assert_eq!(sel.classify(d(2024, 2, 29)), DayCellKind::OutsideMonth);
    }

    #[test]
    fn test_grid_rows_cover_month() {
        let sel = picker();
        let grid = sel.grid();
        // March 2024: Fri 1st to Sun 31st → Feb 26 .. Mar 31
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][0].date, d(2024, 2, 26));
        assert_eq!(grid[0][0].kind, DayCellKind::OutsideMonth);
        assert!(!grid[0][0].is_selectable());
        assert_eq!(grid[0][4].date, d(2024, 3, 1));
        assert_eq!(grid[4][6].date, d(2024, 3, 31));
        let in_month = grid.iter().flatten().filter(|c| c.is_selectable()).count();
        assert_eq!(in_month, 31);
    }
}
