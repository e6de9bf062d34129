//! Visitor statistics query
//!
//! Chains the event store read, daily aggregation, cumulative projection and
//! insight calculation into one [`AnalyticsSummary`]. The engine keeps no
//! state between calls, so overlapping queries do not interfere.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::analytics::aggregator::{aggregate, count_page_visitors};
use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::insights::compute_insights;
use crate::analytics::models::AnalyticsSummary;
use crate::analytics::projector::project;
use crate::analytics::window::Window;
use crate::storage::EventStore;

#[derive(Clone)]
pub struct AnalyticsEngine {
    store: Arc<dyn EventStore>,
}

impl AnalyticsEngine {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Statistics for the `window_size_days` days ending today (UTC)
    pub async fn get_visitor_statistics(
        &self,
        window_size_days: u32,
    ) -> AnalyticsResult<AnalyticsSummary> {
        let today = Utc::now().date_naive();
        self.get_visitor_statistics_at(today, window_size_days).await
    }

    /// Statistics for the `window_size_days` days ending on `window_end`
    pub async fn get_visitor_statistics_at(
        &self,
        window_end: NaiveDate,
        window_size_days: u32,
    ) -> AnalyticsResult<AnalyticsSummary> {
        let window = Window::ending_at(window_end, window_size_days)?;

        let events = self
            .store
            .fetch_events(window.start(), window.end())
            .await
            .map_err(AnalyticsError::store_unavailable)?;
        let prior_visitors = self
            .store
            .fetch_prior_visitors(window.start())
            .await
            .map_err(AnalyticsError::store_unavailable)?;

        debug!(
            window_start = %window.start(),
            window_end = %window.end(),
            events = events.len(),
            prior_visitors = prior_visitors.len(),
            "aggregating visitor statistics"
        );

        let daily_stats = project(aggregate(&events, &prior_visitors, &window))?;
        let page_visitors = count_page_visitors(&events, &window);
        let insights = compute_insights(&daily_stats);

        let new_visitors = daily_stats.iter().map(|s| s.new_visitors).sum();
        let return_visitors = daily_stats.iter().map(|s| s.return_visitors).sum();
        let total_visitors = daily_stats.iter().map(|s| s.total_visitors).sum();
        let today_visitors = daily_stats.last().map_or(0, |s| s.total_visitors);

        Ok(AnalyticsSummary {
            total_visitors,
            today_visitors,
            return_visitors,
            new_visitors,
            page_visitors,
            daily_stats,
            insights,
            window_start: window.start(),
            window_end: window.end(),
            window_size_days: window.size_days(),
        })
    }
}
