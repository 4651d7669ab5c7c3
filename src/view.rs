//! Presentation data for each navigation target.
//!
//! A `ViewModel` holds what a page needs to render: headings, its own path,
//! the drill-down choices it offers and the request that feeds it.

use serde::Serialize;

use crate::error::QueryError;
use crate::navigation::{Destination, MonthTile, NavigationController, NavigationTarget, ViewKind};
use crate::partition;
use crate::period;
use crate::query::{self, FetchRequest};
use crate::route;
use crate::scope::SourceScope;

/// A week drill-down choice on a month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPill {
    pub ordinal: u32,
    /// "Week 1 (Feb 1 - 4)"
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackLink {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub kind: ViewKind,
    pub scope: SourceScope,
    pub title: String,
    pub subtitle: String,
    pub path: String,
    pub month_tiles: Vec<MonthTile>,
    pub week_pills: Vec<WeekPill>,
    pub back_links: Vec<BackLink>,
    pub request: FetchRequest,
}

/// Build the view model for `target`.
pub fn build(nav: &NavigationController, target: &NavigationTarget) -> Result<ViewModel, QueryError> {
    let request = query::resolve(target)?;
    let scope = target.scope();
    let period = target.period();

    let (title, subtitle) = match target.view() {
        ViewKind::Overview => (scope.title().to_string(), overview_subtitle(nav, target)),
        ViewKind::Month => (target.month().label(), scope.title().to_string()),
        ViewKind::Week => (
            "Week View".to_string(),
            period::span_label(period.start(), period.end()),
        ),
        ViewKind::Range => (
            "Work Output".to_string(),
            period::span_label(period.start(), period.end()),
        ),
    };

    let month_tiles = match target.view() {
        ViewKind::Overview => nav.recent_months(),
        _ => Vec::new(),
    };

    let week_pills = match target.view() {
        ViewKind::Month => partition::weeks_of(target.month())
            .into_iter()
            .map(|slice| WeekPill {
                ordinal: slice.ordinal,
                label: slice.label(),
                path: route::destination_path(&nav.week(
                    scope,
                    target.filters(),
                    slice.effective_start,
                    slice.effective_end,
                )),
            })
            .collect(),
        _ => Vec::new(),
    };

    Ok(ViewModel {
        kind: target.view(),
        scope,
        title,
        subtitle,
        path: route::target_path(target),
        month_tiles,
        week_pills,
        back_links: back_links(nav, target),
        request,
    })
}

fn overview_subtitle(nav: &NavigationController, target: &NavigationTarget) -> String {
    let window = period::lookback_label(nav.lookback_for(target.scope()));
    match target.scope() {
        SourceScope::Dashboard => {
            let count = target.filters().len();
            let noun = if count == 1 { "integration" } else { "integrations" };
            format!("{} of your work across {} {}", window, count, noun)
        }
        _ => window,
    }
}

fn back_links(nav: &NavigationController, target: &NavigationTarget) -> Vec<BackLink> {
    let link = |label: String, destination: Destination| BackLink {
        label,
        path: route::destination_path(&destination),
    };
    let scope = target.scope();
    let filters = target.filters();

    match target.view() {
        ViewKind::Overview => match scope {
            SourceScope::Dashboard => vec![link("Change sources".to_string(), Destination::Entry)],
            _ => Vec::new(),
        },
        ViewKind::Month => vec![link(
            format!("Back to {}", scope.title()),
            nav.overview(scope, filters),
        )],
        ViewKind::Week => vec![
            link(format!("Back to {}", target.month().label()), nav.roll_up(target)),
            link(format!("Back to {}", scope.title()), nav.overview(scope, filters)),
        ],
        ViewKind::Range => vec![link(
            format!("Back to {}", SourceScope::Dashboard.title()),
            nav.roll_up(target),
        )],
    }
}
