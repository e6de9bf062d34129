//! Running totals over the daily series

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::analytics::models::DailyStat;

/// Fill the cumulative fields of an ascending daily series
///
/// Fails with [`AnalyticsError::InvalidOrder`] unless dates are strictly
/// ascending. Elements are never reordered or dropped.
pub fn project(mut daily: Vec<DailyStat>) -> AnalyticsResult<Vec<DailyStat>> {
    for (index, pair) in daily.windows(2).enumerate() {
        if pair[0].date >= pair[1].date {
            return Err(AnalyticsError::InvalidOrder {
                index: index + 1,
                previous: pair[0].date,
                current: pair[1].date,
            });
        }
    }

    let (mut total, mut new, mut returning) = (0u64, 0u64, 0u64);
    for stat in &mut daily {
        total += stat.total_visitors;
        new += stat.new_visitors;
        returning += stat.return_visitors;

        stat.cumulative_total_visitors = total;
        stat.cumulative_new_visitors = new;
        stat.cumulative_return_visitors = returning;
    }

    Ok(daily)
}
