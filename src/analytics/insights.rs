//! Summary scalars derived from the daily series

use crate::analytics::models::{DailyStat, InsightMetrics, Insights, NewVsReturning};

/// Derive dashboard insights from a daily series
///
/// Returns [`Insights::NoData`] when the series is empty or holds no visits.
pub fn compute_insights(daily: &[DailyStat]) -> Insights {
    let total: u64 = daily.iter().map(|s| s.total_visitors).sum();
    if daily.is_empty() || total == 0 {
        return Insights::NoData;
    }

    let new: u64 = daily.iter().map(|s| s.new_visitors).sum();
    let returning: u64 = daily.iter().map(|s| s.return_visitors).sum();
    let days = daily.len() as u64;

    // first maximum wins
    let mut peak = &daily[0];
    for stat in &daily[1..] {
        if stat.total_visitors > peak.total_visitors {
            peak = stat;
        }
    }

    let new_vs_returning = if new > 0 && returning > 0 {
        NewVsReturning::Split {
            new_percent: percent(new, total),
            return_percent: percent(returning, total),
        }
    } else {
        NewVsReturning::NotApplicable
    };

    Insights::Available(InsightMetrics {
        average_daily_visitors: round_div(total, days),
        return_visitor_rate_percent: percent(returning, total),
        peak_day: peak.date,
        peak_day_visitors: peak.total_visitors,
        total_page_views: total,
        new_vs_returning,
        tracking_period_days: daily.len() as u32,
    })
}

/// `round(100 * part / whole)`, or 0 when `whole` is 0
pub fn percent(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    round_div(100 * part, whole)
}

/// Integer division rounded to nearest, halves away from zero
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}
