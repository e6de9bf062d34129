//! Error types for the analytics engine

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The event store could not be read. Not retried here.
    #[error("event store unavailable: {0}")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The daily series handed to the projector was not strictly ascending
    #[error("daily series out of order at index {index}: {current} does not follow {previous}")]
    InvalidOrder {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("window size must be between 1 and {max} days, got {requested}")]
    InvalidWindow { requested: u32, max: u32 },
}

impl AnalyticsError {
    pub(crate) fn store_unavailable(err: anyhow::Error) -> Self {
        Self::StoreUnavailable(err.into())
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::InvalidOrder { .. } => "invalid_order",
            Self::InvalidWindow { .. } => "invalid_window",
        }
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
