use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored page visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEvent {
    /// Ingestion sequence number assigned by the event store
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub page_type: String,
    /// Absent keys are always counted as new visitors
    pub visitor_key: Option<String>,
}

impl VisitEvent {
    /// UTC calendar day of the visit
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// A visit that has not been written to the event store yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub timestamp: DateTime<Utc>,
    pub page_type: String,
    pub visitor_key: Option<String>,
}

impl NewVisit {
    /// Blank or whitespace-only visitor keys are stored as absent
    pub fn new(timestamp: DateTime<Utc>, page_type: impl Into<String>, visitor_key: Option<String>) -> Self {
        Self {
            timestamp,
            page_type: page_type.into(),
            visitor_key: visitor_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
        }
    }
}

/// Row layout shared by the SQLite and PostgreSQL `visits` tables
#[derive(Debug, Clone, FromRow)]
pub struct VisitRow {
    pub id: i64,
    /// Unix timestamp (seconds)
    pub visited_at: i64,
    pub page_type: String,
    pub visitor_key: Option<String>,
}

impl TryFrom<VisitRow> for VisitEvent {
    type Error = anyhow::Error;

    fn try_from(row: VisitRow) -> Result<Self> {
        let timestamp = DateTime::from_timestamp(row.visited_at, 0)
            .ok_or_else(|| anyhow!("visit {} has out-of-range timestamp {}", row.id, row.visited_at))?;

        Ok(Self {
            id: row.id,
            timestamp,
            page_type: row.page_type,
            visitor_key: row.visitor_key,
        })
    }
}
