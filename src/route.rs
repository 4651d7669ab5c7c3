//! URL encoding of navigation targets.
//!
//! | View     | Dashboard                         | Per-source (e.g. Jira)       |
//! |----------|-----------------------------------|------------------------------|
//! | entry    | `/`                               | (its overview)               |
//! | overview | `/dashboard?sources=a,b`          | `/jira`                      |
//! | month    | `/month/{y}/{m}?sources=a,b`      | `/jira/month/{y}/{m}`        |
//! | week     | `/week/{start}/{end}?sources=a,b` | `/jira/week/{start}/{end}`   |
//! | range    | `/range/{start}/{end}[?sources=a,b]` | n/a                       |
//!
//! A range without `sources` queries every source. Dates are always
//! `yyyy-MM-dd`. Decoding never fails: malformed paths
//! redirect to the nearest valid ancestor.

use url::form_urlencoded;

use crate::filters::SourceFilterSet;
use crate::navigation::{Destination, NavigationController, NavigationTarget, ViewKind};
use crate::period::{self, YearMonth};
use crate::scope::SourceScope;

pub const ENTRY_PATH: &str = "/";

/// Path (plus query) for a destination.
pub fn destination_path(destination: &Destination) -> String {
    match destination {
        Destination::Entry => ENTRY_PATH.to_string(),
        Destination::View(target) => target_path(target),
    }
}

/// Path (plus query) for a view.
pub fn target_path(target: &NavigationTarget) -> String {
    let period = target.period();
    let tail = match target.view() {
        ViewKind::Overview => None,
        ViewKind::Month => {
            let month = target.month();
            Some(format!("month/{}/{}", month.year(), month.month()))
        }
        ViewKind::Week => Some(format!(
            "week/{}/{}",
            period::format_iso(period.start()),
            period::format_iso(period.end())
        )),
        ViewKind::Range => Some(format!(
            "range/{}/{}",
            period::format_iso(period.start()),
            period::format_iso(period.end())
        )),
    };

    let scope = target.scope();
    let path = match (scope.path_prefix(), tail) {
        (Some(prefix), Some(tail)) => format!("/{}/{}", prefix, tail),
        (Some(prefix), None) => format!("/{}", prefix),
        (None, Some(tail)) => format!("/{}", tail),
        (None, None) => "/dashboard".to_string(),
    };

    // An unfiltered range means every source and has no query.
    let unfiltered_range = target.view() == ViewKind::Range && target.filters().is_empty();
    if scope.carries_sources_query() && !unfiltered_range {
        format!("{}?sources={}", path, sources_query_value(target.filters()))
    } else {
        path
    }
}

/// Decode a path (with optional query string) into a destination.
pub fn resolve_path(nav: &NavigationController, path_and_query: &str) -> Destination {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, query),
        None => (path_and_query, ""),
    };
    let filters = sources_from_query(query);

    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Destination::Entry;
    }
    let segments: Vec<&str> = trimmed.split('/').collect();

    let (scope, rest) = match SourceScope::from_path_prefix(segments[0]) {
        Some(scope) => (scope, &segments[1..]),
        None => (SourceScope::Dashboard, &segments[..]),
    };

    match (scope, rest) {
        (SourceScope::Dashboard, ["dashboard"]) => nav.overview(scope, &filters),
        (_, []) => nav.overview(scope, &filters),
        (_, ["month", year, month]) => match parse_month(year, month) {
            Some(month) => nav.month(scope, &filters, month),
            None => redirect(nav, scope, &filters, path),
        },
        (_, ["week", start, end]) => {
            match (period::parse_iso(start), period::parse_iso(end)) {
                (Ok(start), Ok(end)) => nav.week(scope, &filters, start, end),
                _ => redirect(nav, scope, &filters, path),
            }
        }
        (SourceScope::Dashboard, ["range", start, end]) => {
            match (period::parse_iso(start), period::parse_iso(end)) {
                (Ok(start), Ok(end)) => nav.range(&filters, start, end),
                _ => redirect(nav, scope, &filters, path),
            }
        }
        _ => redirect(nav, scope, &filters, path),
    }
}

fn redirect(
    nav: &NavigationController,
    scope: SourceScope,
    filters: &SourceFilterSet,
    path: &str,
) -> Destination {
    log::info!("Route: invalid path '{}', redirecting to nearest parent", path);
    nav.entry_for(scope, filters)
}

fn parse_month(year: &str, month: &str) -> Option<YearMonth> {
    let year: i32 = year.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    YearMonth::new(year, month).ok()
}

fn sources_from_query(query: &str) -> SourceFilterSet {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "sources")
        .map(|(_, value)| SourceFilterSet::parse(&value))
        .last()
        .unwrap_or_default()
}

/// Ids stay comma-separated; each id is form-encoded on its own.
fn sources_query_value(filters: &SourceFilterSet) -> String {
    filters
        .iter()
        .map(|id| form_urlencoded::byte_serialize(id.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}
