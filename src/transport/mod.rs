//! Work artifact API.
//!
//! The core only needs `fetch(start, end, sources)`; everything about how
//! artifacts are gathered from GitHub, Confluence, Jira and Greenhouse lives
//! behind the API. Responses are decoded leniently: a missing list is empty.
//!
//! Modules:
//! - client: reqwest implementation against `GET /api/artifacts`

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::query::FetchRequest;

pub use client::HttpArtifactClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfluenceDoc {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub space: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraTicket {
    pub key: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "type")]
    pub ticket_type: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub candidate_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub interview_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Everything the API returned for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactsResponse {
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,
    #[serde(default)]
    pub confluence_docs: Vec<ConfluenceDoc>,
    #[serde(default)]
    pub jira_tickets: Vec<JiraTicket>,
    #[serde(default)]
    pub interviews: Vec<Interview>,
}

impl ArtifactsResponse {
    pub fn total(&self) -> usize {
        self.pull_requests.len()
            + self.confluence_docs.len()
            + self.jira_tickets.len()
            + self.interviews.len()
    }
}

/// Source of artifacts for a resolved request.
#[async_trait]
pub trait ArtifactTransport: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<ArtifactsResponse, TransportError>;
}
