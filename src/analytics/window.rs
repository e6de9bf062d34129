//! Trailing window of calendar days

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::analytics::error::{AnalyticsError, AnalyticsResult};

/// Default number of days covered by a query
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Largest window a query may ask for
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Inclusive range of UTC calendar days `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
    size_days: u32,
}

impl Window {
    /// Window of `size_days` days whose last day is `end`
    pub fn ending_at(end: NaiveDate, size_days: u32) -> AnalyticsResult<Self> {
        if size_days == 0 || size_days > MAX_WINDOW_DAYS {
            return Err(AnalyticsError::InvalidWindow {
                requested: size_days,
                max: MAX_WINDOW_DAYS,
            });
        }

        let start = end
            .checked_sub_days(Days::new(u64::from(size_days - 1)))
            .ok_or(AnalyticsError::InvalidWindow {
                requested: size_days,
                max: MAX_WINDOW_DAYS,
            })?;

        Ok(Self {
            start,
            end,
            size_days,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn size_days(&self) -> u32 {
        self.size_days
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Zero-based position of `date` inside the window
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        usize::try_from((date - self.start).num_days()).ok()
    }

    /// Every day of the window in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.size_days as usize)
    }
}
