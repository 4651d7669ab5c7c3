//! Which page family a view belongs to.
//!
//! The generic dashboard carries a user-chosen filter set in the `sources`
//! query parameter. Each per-source page family runs the same month/week
//! navigation with its filter fixed to one source, so the filter is implied by
//! the path prefix and never appears in the URL.

use serde::Serialize;

use crate::filters::{self, SourceFilterSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceScope {
    Dashboard,
    PullRequests,
    Confluence,
    Jira,
    Greenhouse,
}

impl SourceScope {
    pub const PER_SOURCE: [SourceScope; 4] = [
        SourceScope::PullRequests,
        SourceScope::Confluence,
        SourceScope::Jira,
        SourceScope::Greenhouse,
    ];

    /// The one source a per-source scope is pinned to.
    pub fn fixed_source(&self) -> Option<&'static str> {
        match self {
            SourceScope::Dashboard => None,
            SourceScope::PullRequests => Some(filters::GITHUB),
            SourceScope::Confluence => Some(filters::CONFLUENCE),
            SourceScope::Jira => Some(filters::JIRA),
            SourceScope::Greenhouse => Some(filters::GREENHOUSE),
        }
    }

    /// Path segment that prefixes every route in this scope.
    pub fn path_prefix(&self) -> Option<&'static str> {
        match self {
            SourceScope::Dashboard => None,
            SourceScope::PullRequests => Some("pull-requests"),
            SourceScope::Confluence => Some("confluence"),
            SourceScope::Jira => Some("jira"),
            SourceScope::Greenhouse => Some("greenhouse"),
        }
    }

    pub fn from_path_prefix(segment: &str) -> Option<Self> {
        Self::PER_SOURCE
            .into_iter()
            .find(|scope| scope.path_prefix() == Some(segment))
    }

    /// Whether the filter set travels in the URL.
    pub fn carries_sources_query(&self) -> bool {
        matches!(self, SourceScope::Dashboard)
    }

    /// Custom ranges are only offered on the generic dashboard.
    pub fn supports_ranges(&self) -> bool {
        matches!(self, SourceScope::Dashboard)
    }

    /// The filters a view in this scope must use. Per-source scopes ignore
    /// whatever the caller passes.
    pub fn effective_filters(&self, requested: &SourceFilterSet) -> SourceFilterSet {
        match self.fixed_source() {
            Some(id) => SourceFilterSet::single(id),
            None => requested.clone(),
        }
    }

    /// Overview heading.
    pub fn title(&self) -> &'static str {
        match self {
            SourceScope::Dashboard => "Work Output Dashboard",
            SourceScope::PullRequests => "Pull Requests",
            SourceScope::Confluence => "Confluence Docs",
            SourceScope::Jira => "Jira Tickets",
            SourceScope::Greenhouse => "Greenhouse Interviews",
        }
    }
}
