use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{NewVisit, VisitEvent};

/// Append-only record of page visits
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Initialize the storage (create tables, indexes)
    async fn init(&self) -> Result<()>;

    /// Append visits in the given order, returning how many were written
    async fn append_visits(&self, visits: &[NewVisit]) -> Result<u64>;

    /// Visits between the start of `window_start` and the end of `window_end`
    /// (UTC days, inclusive), ordered by timestamp then ingestion order
    async fn fetch_events(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<VisitEvent>>;

    /// Visitor keys with at least one visit before the start of `before`
    async fn fetch_prior_visitors(&self, before: NaiveDate) -> Result<HashSet<String>>;

    /// Total number of stored visits
    async fn count_visits(&self) -> Result<i64>;
}
