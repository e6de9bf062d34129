//! Conversion of UTC calendar days into stored timestamp bounds

use anyhow::{anyhow, Result};
use chrono::{Days, NaiveDate, NaiveTime};

/// Unix timestamp of midnight UTC at the start of `day`
pub(crate) fn day_start(day: NaiveDate) -> i64 {
    day.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// `[start of window_start, start of the day after window_end)`
pub(crate) fn day_range(window_start: NaiveDate, window_end: NaiveDate) -> Result<(i64, i64)> {
    let after_end = window_end
        .checked_add_days(Days::new(1))
        .ok_or_else(|| anyhow!("window end {window_end} is out of range"))?;
    Ok((day_start(window_start), day_start(after_end)))
}
