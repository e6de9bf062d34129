//! Visitor analytics engine
//!
//! Turns stored visit events into a fixed window of daily buckets with
//! cumulative totals, per-page counts and derived insights.

pub mod aggregator;
pub mod engine;
pub mod error;
pub mod insights;
pub mod models;
pub mod projector;
pub mod window;

pub use aggregator::{aggregate, count_page_visitors};
pub use engine::AnalyticsEngine;
pub use error::{AnalyticsError, AnalyticsResult};
pub use insights::compute_insights;
pub use models::{AnalyticsSummary, DailyStat, InsightMetrics, Insights, NewVsReturning};
pub use projector::project;
pub use window::{Window, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
