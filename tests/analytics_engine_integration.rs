//! Integration tests for the visitor statistics query
//!
//! These run the full pipeline (event store read, aggregation, cumulative
//! projection, insights) against an in-memory SQLite event store.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use footfall::analytics::{AnalyticsEngine, AnalyticsError, Insights, NewVsReturning};
use footfall::models::{NewVisit, VisitEvent};
use footfall::storage::{EventStore, SqliteEventStore};
use std::collections::HashSet;
use std::sync::Arc;

/// Last day of the window used throughout these tests (day 30)
fn window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

/// Timestamp on `day` of June 2024 (day 1 is the first day of the window)
fn on_day(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
}

fn visit(timestamp: DateTime<Utc>, page: &str, key: Option<&str>) -> NewVisit {
    NewVisit::new(timestamp, page, key.map(str::to_string))
}

/// Helper to create test storage
async fn create_test_store() -> Arc<dyn EventStore> {
    let store = SqliteEventStore::new("sqlite::memory:", 5).await.unwrap();
    store.init().await.unwrap();
    Arc::new(store)
}

async fn engine_with(visits: &[NewVisit]) -> AnalyticsEngine {
    let store = create_test_store().await;
    if !visits.is_empty() {
        store.append_visits(visits).await.unwrap();
    }
    AnalyticsEngine::new(store)
}

/// Event store whose reads always fail
struct UnavailableStore;

#[async_trait]
impl EventStore for UnavailableStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn append_visits(&self, _visits: &[NewVisit]) -> Result<u64> {
        bail!("connection refused")
    }

    async fn fetch_events(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<VisitEvent>> {
        bail!("connection refused")
    }

    async fn fetch_prior_visitors(&self, _before: NaiveDate) -> Result<HashSet<String>> {
        bail!("connection refused")
    }

    async fn count_visits(&self) -> Result<i64> {
        bail!("connection refused")
    }
}

#[tokio::test]
async fn test_empty_store_yields_zeroed_window() {
    let engine = engine_with(&[]).await;

    let summary = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();

    assert_eq!(summary.total_visitors, 0);
    assert_eq!(summary.today_visitors, 0);
    assert_eq!(summary.daily_stats.len(), 30);
    assert!(summary.daily_stats.iter().all(|s| s.total_visitors == 0
        && s.cumulative_total_visitors == 0));
    assert!(summary.page_visitors.is_empty());
    assert_eq!(summary.insights, Insights::NoData);
}

#[tokio::test]
async fn test_single_visit_on_first_day() {
    let engine = engine_with(&[visit(on_day(1, 10), "home", Some("u1"))]).await;

    let summary = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();

    let first = &summary.daily_stats[0];
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(
        (first.total_visitors, first.new_visitors, first.return_visitors),
        (1, 1, 0)
    );
    for stat in &summary.daily_stats[1..] {
        assert_eq!(stat.cumulative_total_visitors, 1);
        assert_eq!(stat.cumulative_new_visitors, 1);
        assert_eq!(stat.cumulative_return_visitors, 0);
    }
}

#[tokio::test]
async fn test_repeat_visitor_is_returning_on_later_day() {
    let engine = engine_with(&[
        visit(on_day(1, 10), "home", Some("u1")),
        visit(on_day(5, 10), "product", Some("u1")),
    ])
    .await;

    let summary = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();

    assert_eq!(summary.daily_stats[0].new_visitors, 1);
    assert_eq!(summary.daily_stats[4].return_visitors, 1);
    assert_eq!(summary.daily_stats[4].new_visitors, 0);
    assert_eq!((summary.new_visitors, summary.return_visitors), (1, 1));

    let metrics = summary.insights.metrics().unwrap();
    assert_eq!(metrics.return_visitor_rate_percent, 50);
    assert_eq!(
        metrics.new_vs_returning,
        NewVsReturning::Split {
            new_percent: 50,
            return_percent: 50
        }
    );
}

#[tokio::test]
async fn test_peak_day_and_average() {
    let mut visits = Vec::new();
    for hour in 0..10 {
        visits.push(visit(on_day(3, hour), "home", None));
    }
    for hour in 0..7 {
        visits.push(visit(on_day(12, hour), "home", None));
    }
    let engine = engine_with(&visits).await;

    let summary = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();
    let metrics = summary.insights.metrics().unwrap();

    assert_eq!(metrics.peak_day, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    assert_eq!(metrics.peak_day_visitors, 10);
    assert_eq!(metrics.average_daily_visitors, 1);
    assert_eq!(metrics.total_page_views, 17);
    // anonymous visits are always new
    assert_eq!(metrics.new_vs_returning, NewVsReturning::NotApplicable);
}

#[tokio::test]
async fn test_page_visitors_breakdown() {
    let engine = engine_with(&[
        visit(on_day(2, 1), "home", None),
        visit(on_day(2, 2), "home", Some("u2")),
        visit(on_day(9, 3), "product", Some("u2")),
    ])
    .await;

    let summary = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();

    assert_eq!(summary.page_visitors.len(), 2);
    assert_eq!(summary.page_visitors["home"], 2);
    assert_eq!(summary.page_visitors["product"], 1);
}

#[tokio::test]
async fn test_history_before_window_counts_for_classification() {
    let engine = engine_with(&[
        visit(Utc.with_ymd_and_hms(2024, 3, 14, 8, 0, 0).unwrap(), "home", Some("old")),
        visit(on_day(20, 8), "home", Some("old")),
        visit(on_day(20, 9), "home", Some("fresh")),
    ])
    .await;

    let summary = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();

    // the March visit is history only
    assert_eq!(summary.total_visitors, 2);
    assert_eq!(summary.daily_stats[19].return_visitors, 1);
    assert_eq!(summary.daily_stats[19].new_visitors, 1);
    assert_eq!(summary.page_visitors["home"], 2);
}

#[tokio::test]
async fn test_today_and_future_visits() {
    let engine = engine_with(&[
        visit(on_day(30, 23), "home", Some("a")),
        visit(on_day(30, 1), "home", Some("b")),
        visit(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(), "home", Some("c")),
    ])
    .await;

    let summary = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();

    assert_eq!(summary.today_visitors, 2);
    assert_eq!(summary.total_visitors, 2);
    assert_eq!(summary.window_start, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(summary.window_end, window_end());
}

#[tokio::test]
async fn test_series_invariants_hold_for_mixed_traffic() {
    let keys = [Some("a"), Some("b"), None, Some("a"), Some("c"), Some("b"), None];
    let mut visits = Vec::new();
    for day in 1..=30u32 {
        for (slot, key) in keys.iter().enumerate().take((day % 5) as usize) {
            let page = if slot % 2 == 0 { "home" } else { "product" };
            visits.push(visit(on_day(day, slot as u32), page, *key));
        }
    }
    let engine = engine_with(&visits).await;

    for days in [1u32, 7, 30, 45] {
        let summary = engine.get_visitor_statistics_at(window_end(), days).await.unwrap();
        let stats = &summary.daily_stats;

        assert_eq!(stats.len(), days as usize);
        for stat in stats {
            assert_eq!(stat.total_visitors, stat.new_visitors + stat.return_visitors);
        }
        assert_eq!(stats[0].cumulative_total_visitors, stats[0].total_visitors);
        for i in 1..stats.len() {
            assert_eq!(stats[i].date, stats[i - 1].date.succ_opt().unwrap());
            assert_eq!(
                stats[i].cumulative_total_visitors,
                stats[i - 1].cumulative_total_visitors + stats[i].total_visitors
            );
            assert_eq!(
                stats[i].cumulative_new_visitors,
                stats[i - 1].cumulative_new_visitors + stats[i].new_visitors
            );
            assert_eq!(
                stats[i].cumulative_return_visitors,
                stats[i - 1].cumulative_return_visitors + stats[i].return_visitors
            );
        }

        let page_total: u64 = summary.page_visitors.values().sum();
        assert_eq!(page_total, summary.total_visitors);
    }
}

#[tokio::test]
async fn test_repeated_queries_are_identical() {
    let engine = engine_with(&[
        visit(on_day(4, 4), "home", Some("u1")),
        visit(on_day(4, 4), "product", Some("u1")),
        visit(on_day(8, 12), "blog", None),
    ])
    .await;

    let first = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();
    let second = engine.get_visitor_statistics_at(window_end(), 30).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    // same-second visits: the first ingested is new
    assert_eq!(first.daily_stats[3].new_visitors, 1);
    assert_eq!(first.daily_stats[3].return_visitors, 1);
}

#[tokio::test]
async fn test_concurrent_queries_do_not_interfere() {
    let engine = engine_with(&[
        visit(on_day(10, 1), "home", Some("u1")),
        visit(on_day(11, 1), "home", Some("u1")),
    ])
    .await;

    let mut handles = vec![];
    for days in [30u32, 30, 7, 30, 7] {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.get_visitor_statistics_at(window_end(), days).await
        }));
    }

    for handle in handles {
        let summary = handle.await.unwrap().unwrap();
        let expected = if summary.window_size_days == 30 { 2 } else { 0 };
        assert_eq!(summary.total_visitors, expected);
    }
}

#[tokio::test]
async fn test_store_failure_surfaces_as_unavailable() {
    let engine = AnalyticsEngine::new(Arc::new(UnavailableStore));

    let err = engine
        .get_visitor_statistics_at(window_end(), 30)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyticsError::StoreUnavailable(_)));
    assert_eq!(err.kind(), "store_unavailable");
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_invalid_window_is_rejected_before_reading() {
    let engine = AnalyticsEngine::new(Arc::new(UnavailableStore));

    let err = engine.get_visitor_statistics_at(window_end(), 0).await.unwrap_err();

    assert!(matches!(err, AnalyticsError::InvalidWindow { requested: 0, .. }));
}

#[tokio::test]
async fn test_window_ending_today_by_default() {
    let store = create_test_store().await;
    store
        .append_visits(&[visit(Utc::now(), "home", Some("now"))])
        .await
        .unwrap();
    let engine = AnalyticsEngine::new(store);

    let summary = engine.get_visitor_statistics(30).await.unwrap();

    // a run straddling midnight can land the visit on yesterday
    assert!(summary.window_end >= Utc::now().date_naive().pred_opt().unwrap());
    assert_eq!(summary.daily_stats.len(), 30);
    assert_eq!(summary.total_visitors, 1);
}
