//! Drill-down / roll-up navigation between overview, month, week and range
//! views.
//!
//! The controller never fails. Input that cannot produce a valid view (bad
//! month, inverted dates, no sources on a filtered view) resolves to the
//! nearest valid ancestor instead: the entry page for the dashboard, or the
//! per-source overview for a per-source scope.

use chrono::NaiveDate;
use serde::Serialize;

use crate::filters::SourceFilterSet;
use crate::partition::{self, WeekSlice};
use crate::period::{self, Period, YearMonth};
use crate::scope::SourceScope;

/// Default lookback for overview views, in months.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

/// Number of month tiles offered on an overview.
pub const RECENT_MONTH_COUNT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    Overview,
    Month,
    Week,
    Range,
}

impl ViewKind {
    /// Range views may query every source; all others need a filter set.
    pub fn requires_filters(&self) -> bool {
        !matches!(self, ViewKind::Range)
    }
}

/// A fully resolved view: what period, which sources, which page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTarget {
    period: Period,
    filters: SourceFilterSet,
    view: ViewKind,
    scope: SourceScope,
}

impl NavigationTarget {
    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn filters(&self) -> &SourceFilterSet {
        &self.filters
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn scope(&self) -> SourceScope {
        self.scope
    }

    /// Month shown by a month view, or containing a week/range start.
    pub fn month(&self) -> YearMonth {
        self.period.start_month()
    }
}

/// Where a navigation step lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "camelCase")]
pub enum Destination {
    /// The source-selection entry page.
    Entry,
    View(NavigationTarget),
}

impl Destination {
    pub fn target(&self) -> Option<&NavigationTarget> {
        match self {
            Destination::Entry => None,
            Destination::View(target) => Some(target),
        }
    }

    pub fn into_target(self) -> Option<NavigationTarget> {
        match self {
            Destination::Entry => None,
            Destination::View(target) => Some(target),
        }
    }
}

/// A month tile on an overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTile {
    pub year: i32,
    pub month: u32,
    /// "Feb 2024"
    pub label: String,
    pub period: Period,
}

impl MonthTile {
    pub fn year_month(&self) -> YearMonth {
        self.period.start_month()
    }
}

/// User actions on a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Confirm the filter choice on the entry page.
    SelectSources(SourceFilterSet),
    OpenMonth(YearMonth),
    OpenWeek(WeekSlice),
    /// Confirmed output of the range picker.
    OpenRange(Period),
    /// Previous/next natural week from a week view.
    StepWeek(i64),
    /// Jump to the natural week containing today.
    CurrentWeek,
    RollUp,
    /// Back to the overview, keeping filters.
    Home,
}

/// Builds navigation targets relative to a fixed "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationController {
    today: NaiveDate,
    lookback_months: u32,
}

impl NavigationController {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            lookback_months: DEFAULT_LOOKBACK_MONTHS,
        }
    }

    pub fn with_lookback(mut self, months: u32) -> Self {
        self.lookback_months = months;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Lookback window for an overview. Only the dashboard honours a
    /// configured lookback; per-source pages always use the default.
    pub fn lookback_for(&self, scope: SourceScope) -> u32 {
        match scope {
            SourceScope::Dashboard => self.lookback_months,
            _ => DEFAULT_LOOKBACK_MONTHS,
        }
    }

    /// The six most recent months, newest first, starting with today's.
    pub fn recent_months(&self) -> Vec<MonthTile> {
        let current = YearMonth::from_date(self.today);
        (0..RECENT_MONTH_COUNT)
            .filter_map(|i| current.sub_months(i))
            .map(|ym| MonthTile {
                year: ym.year(),
                month: ym.month(),
                label: ym.short_label(),
                period: Period::month(ym),
            })
            .collect()
    }

    /// Entry → overview with the chosen filters.
    pub fn overview(&self, scope: SourceScope, filters: &SourceFilterSet) -> Destination {
        match period::default_lookback(self.today, self.lookback_for(scope)) {
            Ok(period) => self.build(scope, filters, ViewKind::Overview, period),
            Err(e) => {
                log::warn!("Navigation: cannot compute lookback from {}: {}", self.today, e);
                Destination::Entry
            }
        }
    }

    pub fn month(
        &self,
        scope: SourceScope,
        filters: &SourceFilterSet,
        month: YearMonth,
    ) -> Destination {
        self.build(scope, filters, ViewKind::Month, Period::month(month))
    }

    pub fn week(
        &self,
        scope: SourceScope,
        filters: &SourceFilterSet,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Destination {
        match Period::week(start, end) {
            Ok(period) => self.build(scope, filters, ViewKind::Week, period),
            Err(e) => {
                log::warn!("Navigation: invalid week: {}", e);
                self.entry_for(scope, filters)
            }
        }
    }

    /// A custom range. An empty filter set means every source.
    pub fn range(&self, filters: &SourceFilterSet, start: NaiveDate, end: NaiveDate) -> Destination {
        match Period::range(start, end) {
            Ok(period) => self.build(SourceScope::Dashboard, filters, ViewKind::Range, period),
            Err(e) => {
                log::warn!("Navigation: invalid range: {}", e);
                self.entry_for(SourceScope::Dashboard, filters)
            }
        }
    }

    /// Nearest valid ancestor when a view cannot be built.
    ///
    /// Per-source scopes fall back to their own overview since their filter
    /// is implicit; the dashboard falls back to source selection.
    pub fn entry_for(&self, scope: SourceScope, filters: &SourceFilterSet) -> Destination {
        match scope {
            SourceScope::Dashboard => Destination::Entry,
            _ => self.overview(scope, filters),
        }
    }

    /// One level coarser than `current`.
    pub fn roll_up(&self, current: &NavigationTarget) -> Destination {
        match current.view {
            ViewKind::Week => self.month(current.scope, &current.filters, current.month()),
            ViewKind::Month => self.overview(current.scope, &current.filters),
            ViewKind::Range if current.filters.is_empty() => Destination::Entry,
            ViewKind::Range => self.overview(current.scope, &current.filters),
            ViewKind::Overview => Destination::Entry,
        }
    }

    /// Resolve the next view for `action` taken on `current`.
    pub fn apply(&self, current: &NavigationTarget, action: NavAction) -> Destination {
        let scope = current.scope;
        let filters = &current.filters;

        match (current.view, action) {
            (_, NavAction::RollUp) => self.roll_up(current),
            (_, NavAction::Home) => self.overview(scope, filters),
            (ViewKind::Range, NavAction::OpenMonth(_) | NavAction::OpenWeek(_)) => {
                log::debug!("Navigation: range views have no drill-down");
                self.stay(current)
            }
            (_, NavAction::SelectSources(chosen)) => self.overview(scope, &chosen),
            (_, NavAction::OpenMonth(month)) => self.month(scope, filters, month),
            (ViewKind::Month, NavAction::OpenWeek(slice)) => {
                if current.period.contains(slice.effective_start) {
                    self.week(scope, filters, slice.effective_start, slice.effective_end)
                } else {
                    log::debug!(
                        "Navigation: week {} is not in {}",
                        slice.ordinal,
                        current.month().label()
                    );
                    self.stay(current)
                }
            }
            (_, NavAction::OpenWeek(_)) => self.stay(current),
            (_, NavAction::OpenRange(period)) if scope.supports_ranges() => {
                self.range(filters, period.start(), period.end())
            }
            (_, NavAction::OpenRange(_)) => self.stay(current),
            (ViewKind::Week, NavAction::StepWeek(offset)) => {
                match partition::shift_week(current.period.start(), offset) {
                    Ok(week) => self.week(scope, filters, week.start(), week.end()),
                    Err(_) => self.stay(current),
                }
            }
            (ViewKind::Week, NavAction::CurrentWeek) => match partition::natural_week(self.today) {
                Ok(week) => self.week(scope, filters, week.start(), week.end()),
                Err(_) => self.stay(current),
            },
            (_, NavAction::StepWeek(_) | NavAction::CurrentWeek) => self.stay(current),
        }
    }

    fn stay(&self, current: &NavigationTarget) -> Destination {
        Destination::View(current.clone())
    }

    fn build(
        &self,
        scope: SourceScope,
        filters: &SourceFilterSet,
        view: ViewKind,
        period: Period,
    ) -> Destination {
        let filters = scope.effective_filters(filters);
        if view.requires_filters() && filters.is_empty() {
            log::info!("Navigation: no sources selected for {:?} view, redirecting to entry", view);
            return Destination::Entry;
        }
        Destination::View(NavigationTarget {
            period,
            filters,
            view,
            scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn controller() -> NavigationController {
        NavigationController::new(d(2024, 8, 14))
    }

    fn sources() -> SourceFilterSet {
        SourceFilterSet::parse("github,jira")
    }

    fn view(dest: Destination) -> NavigationTarget {
        dest.into_target().expect("expected a view destination")
    }

    #[test]
    fn test_entry_requires_sources() {
        let nav = controller();
        assert_eq!(
            nav.overview(SourceScope::Dashboard, &SourceFilterSet::new()),
            Destination::Entry
        );
    }

    #[test]
    fn test_overview_uses_default_lookback() {
        let target = view(controller().overview(SourceScope::Dashboard, &sources()));
        assert_eq!(target.view(), ViewKind::Overview);
        assert_eq!(target.period().start(), d(2024, 2, 1));
        assert_eq!(target.period().end(), d(2024, 8, 14));
        assert_eq!(target.filters(), &sources());
    }

    #[test]
    fn test_configured_lookback_applies_to_dashboard_only() {
        let nav = controller().with_lookback(3);
        let dashboard = view(nav.overview(SourceScope::Dashboard, &sources()));
        assert_eq!(dashboard.period().start(), d(2024, 5, 1));

        let jira = view(nav.overview(SourceScope::Jira, &SourceFilterSet::new()));
        assert_eq!(jira.period().start(), d(2024, 2, 1));
        assert_eq!(jira.period().end(), d(2024, 8, 14));
    }

    #[test]
    fn test_recent_months_newest_first() {
        let tiles = controller().recent_months();
        let labels: Vec<&str> = tiles.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Aug 2024", "Jul 2024", "Jun 2024", "May 2024", "Apr 2024", "Mar 2024"]
        );
        assert_eq!((tiles[5].year, tiles[5].month), (2024, 3));
    }

    #[test]
    fn test_recent_months_cross_year_and_clamp_day() {
        let nav = NavigationController::new(d(2024, 3, 31));
        let tiles = nav.recent_months();
        assert_eq!((tiles[1].year, tiles[1].month), (2024, 2));
        assert_eq!((tiles[5].year, tiles[5].month), (2023, 10));
    }

    #[test]
    fn test_overview_to_month_carries_filters() {
        let nav = controller();
        let overview = view(nav.overview(SourceScope::Dashboard, &sources()));
        let tile = &nav.recent_months()[2];
        let month = view(nav.apply(&overview, NavAction::OpenMonth(tile.year_month())));
        assert_eq!(month.view(), ViewKind::Month);
        assert_eq!(month.period().start(), d(2024, 6, 1));
        assert_eq!(month.period().end(), d(2024, 6, 30));
        assert_eq!(month.filters(), &sources());
    }

    #[test]
    fn test_month_week_month_round_trip() {
        let nav = controller();
        let feb = YearMonth::new(2024, 2).unwrap();
        let month = view(nav.month(SourceScope::Dashboard, &sources(), feb));
        for slice in partition::weeks_of(feb) {
            let week = view(nav.apply(&month, NavAction::OpenWeek(slice)));
            assert_eq!(week.view(), ViewKind::Week);
            assert_eq!(week.period().start(), slice.effective_start);
            assert_eq!(week.period().end(), slice.effective_end);
            assert_eq!(week.filters(), &sources());

            let back = view(nav.apply(&week, NavAction::RollUp));
            assert_eq!(back, month);
        }
    }

    #[test]
    fn test_week_from_other_month_is_ignored() {
        let nav = controller();
        let month = view(nav.month(SourceScope::Dashboard, &sources(), YearMonth::new(2024, 3).unwrap()));
        let feb_slice = partition::weeks_of(YearMonth::new(2024, 2).unwrap())[0];
        assert_eq!(nav.apply(&month, NavAction::OpenWeek(feb_slice)), Destination::View(month));
    }

    #[test]
    fn test_range_is_leaf_but_rolls_up() {
        let nav = controller();
        let overview = view(nav.overview(SourceScope::Dashboard, &sources()));
        let picked = Period::range(d(2024, 7, 3), d(2024, 7, 19)).unwrap();
        let range = view(nav.apply(&overview, NavAction::OpenRange(picked)));
        assert_eq!(range.view(), ViewKind::Range);
        assert_eq!(range.period().kind(), PeriodKind::Range);
        assert_eq!(range.filters(), &sources());

        let slice = partition::weeks_of(YearMonth::new(2024, 7).unwrap())[0];
        assert_eq!(nav.apply(&range, NavAction::OpenWeek(slice)), Destination::View(range.clone()));
        assert_eq!(
            nav.apply(&range, NavAction::OpenMonth(YearMonth::new(2024, 7).unwrap())),
            Destination::View(range.clone())
        );

        let up = view(nav.apply(&range, NavAction::RollUp));
        assert_eq!(up.view(), ViewKind::Overview);
    }

    #[test]
    fn test_unfiltered_range_rolls_up_to_entry() {
        let nav = controller();
        let range = view(nav.range(&SourceFilterSet::new(), d(2024, 7, 1), d(2024, 7, 2)));
        assert!(range.filters().is_empty());
        assert_eq!(nav.roll_up(&range), Destination::Entry);
    }

    #[test]
    fn test_inverted_range_redirects() {
        let nav = controller();
        assert_eq!(nav.range(&sources(), d(2024, 7, 5), d(2024, 7, 1)), Destination::Entry);
    }

    #[test]
    fn test_month_rolls_up_to_overview_and_overview_to_entry() {
        let nav = controller();
        let month = view(nav.month(SourceScope::Dashboard, &sources(), YearMonth::new(2024, 5).unwrap()));
        let overview = view(nav.roll_up(&month));
        assert_eq!(overview.view(), ViewKind::Overview);
        assert_eq!(nav.roll_up(&overview), Destination::Entry);
    }

    #[test]
    fn test_step_week_and_current_week() {
        let nav = controller();
        let week = view(nav.week(SourceScope::Dashboard, &sources(), d(2024, 2, 1), d(2024, 2, 4)));
        let next = view(nav.apply(&week, NavAction::StepWeek(1)));
        assert_eq!(next.period().start(), d(2024, 2, 5));
        assert_eq!(next.period().end(), d(2024, 2, 11));

        let now = view(nav.apply(&week, NavAction::CurrentWeek));
        assert_eq!(now.period().start(), d(2024, 8, 12));
        assert_eq!(now.period().end(), d(2024, 8, 18));
        assert_eq!(now.filters(), &sources());
    }

    #[test]
    fn test_step_week_past_calendar_limit_stays() {
        let nav = controller();
        let week = view(nav.week(SourceScope::Dashboard, &sources(), d(2024, 2, 5), d(2024, 2, 11)));
        for offset in [i64::MIN, i64::MAX] {
            assert_eq!(
                nav.apply(&week, NavAction::StepWeek(offset)),
                Destination::View(week.clone())
            );
        }
    }

    #[test]
    fn test_per_source_scope_pins_filter() {
        let nav = controller();
        let target = view(nav.overview(SourceScope::Jira, &SourceFilterSet::new()));
        assert_eq!(target.filters(), &SourceFilterSet::single("jira"));
        assert_eq!(target.scope(), SourceScope::Jira);
    }

    #[test]
    fn test_per_source_entry_is_its_overview() {
        let nav = controller();
        let entry = view(nav.entry_for(SourceScope::Greenhouse, &SourceFilterSet::new()));
        assert_eq!(entry.view(), ViewKind::Overview);
        assert_eq!(entry.scope(), SourceScope::Greenhouse);
    }

    #[test]
    fn test_per_source_has_no_ranges() {
        let nav = controller();
        let overview = view(nav.overview(SourceScope::PullRequests, &SourceFilterSet::new()));
        let picked = Period::range(d(2024, 7, 3), d(2024, 7, 19)).unwrap();
        assert_eq!(
            nav.apply(&overview, NavAction::OpenRange(picked)),
            Destination::View(overview.clone())
        );
    }

    #[test]
    fn test_select_sources_from_entry() {
        let nav = controller();
        let overview = view(nav.overview(SourceScope::Dashboard, &sources()));
        let changed = view(nav.apply(&overview, NavAction::SelectSources(SourceFilterSet::single("confluence"))));
        assert_eq!(changed.filters(), &SourceFilterSet::single("confluence"));
        assert_eq!(
            nav.apply(&overview, NavAction::SelectSources(SourceFilterSet::new())),
            Destination::Entry
        );
    }
}
