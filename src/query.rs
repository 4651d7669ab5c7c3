//! Period query resolution and stale-response suppression.
//!
//! `resolve` turns a navigation target into the canonical request sent to the
//! artifact API. `QuerySession` owns the view state for one open view and the
//! fetch epoch: every issued request bumps the epoch, and a completion is only
//! applied when its epoch is still the latest. Completions are never cancelled
//! at the transport level, they just become no-ops.
//!
//! Closing the session forfeits every outstanding epoch.

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{FetchFailure, QueryError, TransportError};
use crate::filters::SourceFilterSet;
use crate::navigation::NavigationTarget;
use crate::period::{self, format_iso};
use crate::transport::{ArtifactTransport, ArtifactsResponse};

/// Canonical request for one period. Empty `sources` means every source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
    pub start_date: String,
    pub end_date: String,
    pub sources: Vec<String>,
}

/// Request for a navigation target.
pub fn resolve(target: &NavigationTarget) -> Result<FetchRequest, QueryError> {
    let filters = target.filters();
    if target.view().requires_filters() && filters.is_empty() {
        return Err(QueryError::MissingFilters);
    }
    let period = target.period();
    build_request(period.start(), period.end(), filters)
}

/// Request for the default lookback window ending at `today`, used when no
/// period has been chosen.
pub fn resolve_lookback(
    today: NaiveDate,
    months: u32,
    filters: &SourceFilterSet,
) -> Result<FetchRequest, QueryError> {
    let period = period::default_lookback(today, months)?;
    build_request(period.start(), period.end(), filters)
}

/// Rejects `start > end` instead of querying it.
pub fn build_request(
    start: NaiveDate,
    end: NaiveDate,
    sources: &SourceFilterSet,
) -> Result<FetchRequest, QueryError> {
    if start > end {
        log::error!("Query: refusing inverted period {}..{}", start, end);
        return Err(QueryError::InvertedPeriod {
            start: format_iso(start),
            end: format_iso(end),
        });
    }
    Ok(FetchRequest {
        start_date: format_iso(start),
        end_date: format_iso(end),
        sources: sources.to_vec(),
    })
}

/// What the view currently shows.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Latest issued request.
    pub request: Option<FetchRequest>,
    pub data: Option<ArtifactsResponse>,
    pub loading: bool,
    pub error: Option<FetchFailure>,
}

/// Handle for one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub epoch: u64,
    pub request: FetchRequest,
}

struct SessionInner {
    epoch: u64,
    closed: bool,
    view: ViewState,
}

/// Per-view fetch state guarded by the epoch.
pub struct QuerySession {
    inner: Mutex<SessionInner>,
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuerySession {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SessionInner {
                epoch: 0,
                closed: false,
                view: ViewState::default(),
            }),
        }
    }

    pub fn current_epoch(&self) -> u64 {
        self.inner.lock().epoch
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Start a request for `target`. Marks the view loading and clears any
    /// earlier error; previously loaded data stays visible until the request
    /// settles. A failed request clears it.
    pub fn issue(&self, target: &NavigationTarget) -> Result<FetchTicket, QueryError> {
        let request = resolve(target)?;
        self.issue_request(request)
    }

    pub fn issue_request(&self, request: FetchRequest) -> Result<FetchTicket, QueryError> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(QueryError::ViewClosed);
        }
        inner.epoch += 1;
        inner.view.request = Some(request.clone());
        inner.view.loading = true;
        inner.view.error = None;
        log::debug!(
            "Query: issued epoch {} for {}..{}",
            inner.epoch,
            request.start_date,
            request.end_date
        );
        Ok(FetchTicket {
            epoch: inner.epoch,
            request,
        })
    }

    /// Apply a completion. Returns false when the ticket is stale or the
    /// session is closed, in which case nothing changes.
    pub fn settle(
        &self,
        ticket: &FetchTicket,
        result: Result<ArtifactsResponse, TransportError>,
    ) -> bool {
        let mut inner = self.inner.lock();
        if inner.closed || ticket.epoch != inner.epoch {
            log::debug!(
                "Query: discarding stale response for epoch {} (current {}, closed {})",
                ticket.epoch,
                inner.epoch,
                inner.closed
            );
            return false;
        }

        inner.view.loading = false;
        match result {
            Ok(data) => {
                inner.view.data = Some(data);
                inner.view.error = None;
            }
            Err(e) => {
                log::warn!("Query: fetch for epoch {} failed: {}", ticket.epoch, e);
                inner.view.data = None;
                inner.view.error = Some(FetchFailure::from(&e));
            }
        }
        true
    }

    /// Forfeit all outstanding epochs. Later completions and requests are
    /// rejected.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.closed = true;
        inner.view.loading = false;
    }

    pub fn snapshot(&self) -> ViewState {
        self.inner.lock().view.clone()
    }

    /// Issue, fetch and settle. Returns whether the result was applied.
    pub async fn load<T: ArtifactTransport + ?Sized>(
        &self,
        transport: &T,
        target: &NavigationTarget,
    ) -> Result<bool, QueryError> {
        let ticket = self.issue(target)?;
        let result = transport.fetch(&ticket.request).await;
        Ok(self.settle(&ticket, result))
    }
}
