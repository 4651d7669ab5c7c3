//! Source filter sets and the integration catalog shown at the entry point.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

pub const GITHUB: &str = "github";
pub const CONFLUENCE: &str = "confluence";
pub const JIRA: &str = "jira";
pub const GREENHOUSE: &str = "greenhouse";

/// An integration the user can select on the entry page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const INTEGRATIONS: &[Integration] = &[
    Integration {
        id: GITHUB,
        label: "GitHub PRs",
        description: "Pull requests you authored or reviewed",
    },
    Integration {
        id: CONFLUENCE,
        label: "Confluence Docs",
        description: "Pages you created or edited",
    },
    Integration {
        id: JIRA,
        label: "Jira Tickets",
        description: "Tickets you worked on or resolved",
    },
    Integration {
        id: GREENHOUSE,
        label: "Greenhouse Interviews",
        description: "Interviews you conducted",
    },
];

/// Unordered, deduplicated set of source identifiers.
///
/// Ids are normalized (trimmed, lowercased); empty ids are dropped. Iteration
/// order is sorted, which keeps URLs and fetch requests canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceFilterSet {
    ids: BTreeSet<String>,
}

impl SourceFilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every integration in the catalog ("Select All").
    pub fn all_integrations() -> Self {
        INTEGRATIONS.iter().map(|i| i.id).collect()
    }

    /// A set holding exactly one source.
    pub fn single(id: &str) -> Self {
        std::iter::once(id).collect()
    }

    /// Parse the `sources` query value, e.g. `"github,jira"`.
    pub fn parse(value: &str) -> Self {
        value.split(',').collect()
    }

    /// Insert a source; returns false if it was already present or blank.
    pub fn insert(&mut self, id: &str) -> bool {
        match normalize_id(id) {
            Some(key) => self.ids.insert(key),
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        match normalize_id(id) {
            Some(key) => self.ids.remove(&key),
            None => false,
        }
    }

    /// Checkbox behaviour on the entry page.
    pub fn toggle(&mut self, id: &str) {
        if !self.remove(id) {
            self.insert(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        normalize_id(id).is_some_and(|key| self.ids.contains(&key))
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether every catalog integration is selected.
    pub fn covers_all_integrations(&self) -> bool {
        INTEGRATIONS.iter().all(|i| self.ids.contains(i.id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Comma-joined form used in the `sources` query parameter.
    pub fn to_query_value(&self) -> String {
        self.to_vec().join(",")
    }
}

impl<'de> Deserialize<'de> for SourceFilterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Vec::<String>::deserialize(deserializer)?;
        Ok(ids.into_iter().collect())
    }
}

impl<S: AsRef<str>> FromIterator<S> for SourceFilterSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id.as_ref());
        }
        set
    }
}

fn normalize_id(id: &str) -> Option<String> {
    let key = id.trim().to_lowercase();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}
