//! Data models for analytics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Visit counts for one calendar day of the window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: NaiveDate,

    /// Always `new_visitors + return_visitors`
    pub total_visitors: u64,
    pub new_visitors: u64,
    pub return_visitors: u64,

    /// Running sums from the first day of the window through this day
    pub cumulative_total_visitors: u64,
    pub cumulative_new_visitors: u64,
    pub cumulative_return_visitors: u64,
}

impl DailyStat {
    /// Empty bucket for `date`
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_visitors: 0,
            new_visitors: 0,
            return_visitors: 0,
            cumulative_total_visitors: 0,
            cumulative_new_visitors: 0,
            cumulative_return_visitors: 0,
        }
    }

    pub(crate) fn record(&mut self, class: VisitorClass) {
        self.total_visitors += 1;
        match class {
            VisitorClass::New => self.new_visitors += 1,
            VisitorClass::Return => self.return_visitors += 1,
        }
    }
}

/// Whether a visit came from a first-time or a returning visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorClass {
    New,
    Return,
}

/// Split of window visits between new and returning visitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NewVsReturning {
    /// Only reported when both groups are present
    NotApplicable,
    Split {
        #[serde(rename = "newPercent")]
        new_percent: u64,
        #[serde(rename = "returnPercent")]
        return_percent: u64,
    },
}

/// Scalars derived from a non-empty daily series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightMetrics {
    pub average_daily_visitors: u64,
    pub return_visitor_rate_percent: u64,
    pub peak_day: NaiveDate,
    pub peak_day_visitors: u64,
    pub total_page_views: u64,
    pub new_vs_returning: NewVsReturning,
    pub tracking_period_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Insights {
    /// Nothing has been recorded in the window
    NoData,
    Available(InsightMetrics),
}

impl Insights {
    pub fn metrics(&self) -> Option<&InsightMetrics> {
        match self {
            Self::NoData => None,
            Self::Available(metrics) => Some(metrics),
        }
    }
}

/// Result of a visitor statistics query
///
/// Computed fresh on every query and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_visitors: u64,
    /// Visits on the last day of the window
    pub today_visitors: u64,
    pub return_visitors: u64,
    pub new_visitors: u64,

    /// Visits per page type over the window
    #[serde(default)]
    pub page_visitors: BTreeMap<String, u64>,

    /// One entry per window day, ascending, zero-filled
    pub daily_stats: Vec<DailyStat>,

    pub insights: Insights,

    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub window_size_days: u32,
}
