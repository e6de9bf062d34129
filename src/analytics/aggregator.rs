//! Daily bucketing and new/return classification
//!
//! Visits are bucketed by UTC calendar day. A visit counts as "new" when its
//! visitor key has not been seen in any earlier event, either in the history
//! before the window (`prior_visitors`) or earlier in the scanned events.
//! Visits without a key are always new.

use std::collections::{BTreeMap, HashSet};

use crate::analytics::models::{DailyStat, VisitorClass};
use crate::analytics::window::Window;
use crate::models::VisitEvent;

/// Bucket `events` into one [`DailyStat`] per window day
///
/// Only the daily (non-cumulative) fields are filled. Events after the window
/// are ignored; events before it are not counted but still mark their
/// visitor key as seen. Events sharing a timestamp keep their input order.
pub fn aggregate(
    events: &[VisitEvent],
    prior_visitors: &HashSet<String>,
    window: &Window,
) -> Vec<DailyStat> {
    let mut buckets: Vec<DailyStat> = window.days().map(DailyStat::empty).collect();
    let mut seen: HashSet<&str> = prior_visitors.iter().map(String::as_str).collect();

    for event in in_timestamp_order(events) {
        let date = event.date();
        if date > window.end() {
            continue;
        }

        let class = match event.visitor_key.as_deref() {
            Some(key) if !seen.insert(key) => VisitorClass::Return,
            _ => VisitorClass::New,
        };

        if let Some(index) = window.index_of(date) {
            buckets[index].record(class);
        }
    }

    buckets
}

/// Count visits per page type inside the window
pub fn count_page_visitors(events: &[VisitEvent], window: &Window) -> BTreeMap<String, u64> {
    let mut pages = BTreeMap::new();

    for event in events.iter().filter(|e| window.contains(e.date())) {
        *pages.entry(event.page_type.clone()).or_insert(0) += 1;
    }

    pages
}

fn in_timestamp_order(events: &[VisitEvent]) -> Vec<&VisitEvent> {
    let mut ordered: Vec<&VisitEvent> = events.iter().collect();
    // stable: ties keep ingestion order
    ordered.sort_by_key(|event| event.timestamp);
    ordered
}
