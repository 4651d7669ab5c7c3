//! Work log: browse work artifacts by overview, month, week or custom range.
//!
//! The calendar engine is pure and takes "today" as input: `period`,
//! `partition`, `range_selector`, `navigation`, `route`. `query` turns views
//! into requests and guards view state against stale responses; `transport`
//! talks to the artifact API.

pub mod config;
pub mod error;
pub mod filters;
pub mod navigation;
pub mod partition;
pub mod period;
pub mod query;
pub mod range_selector;
pub mod route;
pub mod scope;
pub mod transport;
pub mod view;
