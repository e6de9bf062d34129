use crate::models::{NewVisit, VisitEvent, VisitRow};
use crate::storage::bounds::{day_range, day_start};
use crate::storage::EventStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;

pub struct SqliteEventStore {
    pool: Arc<SqlitePool>,
}

impl SqliteEventStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS visits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                visited_at INTEGER NOT NULL,
                page_type TEXT NOT NULL,
                visitor_key TEXT
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_visits_visited_at ON visits(visited_at, id)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_visits_visitor_key ON visits(visitor_key, visited_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn append_visits(&self, visits: &[NewVisit]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for visit in visits {
            let result = sqlx::query(
                r#"
                INSERT INTO visits (visited_at, page_type, visitor_key)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(visit.timestamp.timestamp())
            .bind(&visit.page_type)
            .bind(visit.visitor_key.as_deref())
            .execute(&mut *tx)
            .await?;

            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    async fn fetch_events(
        &self,
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> Result<Vec<VisitEvent>> {
        let (from, until) = day_range(window_start, window_end)?;

        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, visited_at, page_type, visitor_key
            FROM visits
            WHERE visited_at >= ? AND visited_at < ?
            ORDER BY visited_at ASC, id ASC
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(VisitEvent::try_from).collect()
    }

    async fn fetch_prior_visitors(&self, before: NaiveDate) -> Result<HashSet<String>> {
        let keys = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT visitor_key
            FROM visits
            WHERE visitor_key IS NOT NULL AND visited_at < ?
            "#,
        )
        .bind(day_start(before))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(keys.into_iter().collect())
    }

    async fn count_visits(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visits")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
