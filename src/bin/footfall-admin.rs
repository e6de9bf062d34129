use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use footfall::analytics::AnalyticsEngine;
use footfall::config::{Config, DatabaseBackend};
use footfall::models::NewVisit;
use footfall::report;
use footfall::storage::{EventStore, PostgresEventStore, SqliteEventStore};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "footfall-admin")]
#[command(about = "Footfall visitor analytics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print visitor statistics for a trailing window
    Stats {
        /// Window size in days (defaults to ANALYTICS_WINDOW_DAYS)
        #[arg(long)]
        days: Option<u32>,
        /// Last day of the window, YYYY-MM-DD (defaults to today, UTC)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Print the raw JSON summary instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// Record a single visit now
    Record {
        /// Page type label (e.g. home, product)
        page_type: String,
        /// Visitor identifier; omitted visits always count as new
        #[arg(long)]
        visitor_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store: Arc<dyn EventStore> = match config.database.backend {
        DatabaseBackend::Sqlite => Arc::new(
            SqliteEventStore::new(&config.database.url, config.database.max_connections).await?,
        ),
        DatabaseBackend::Postgres => Arc::new(
            PostgresEventStore::new(&config.database.url, config.database.max_connections)
                .await?,
        ),
    };

    // Ensure database is initialized
    store.init().await?;

    match cli.command {
        Commands::Stats { days, end, json } => {
            let engine = AnalyticsEngine::new(Arc::clone(&store));
            let days = days.unwrap_or(config.analytics.default_window_days);
            let end = end.unwrap_or_else(|| Utc::now().date_naive());

            let summary = engine
                .get_visitor_statistics_at(end, days)
                .await
                .context("Failed to load visitor analytics")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render(&summary));
            }
        }
        Commands::Record {
            page_type,
            visitor_key,
        } => {
            let page_type = page_type.trim().to_string();
            anyhow::ensure!(!page_type.is_empty(), "page type cannot be empty");

            let visit = NewVisit::new(Utc::now(), page_type, visitor_key);
            store.append_visits(std::slice::from_ref(&visit)).await?;
            println!(
                "✓ Recorded '{}' visit at {}",
                visit.page_type,
                visit.timestamp.to_rfc3339()
            );
        }
    }

    Ok(())
}
