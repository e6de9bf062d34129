use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::analytics::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub api_server: ServerConfig,
    pub tracking_server: ServerConfig,
    pub analytics: AnalyticsConfig,
    pub recorder: RecorderConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Window used when a query does not name one
    #[serde(default = "AnalyticsConfig::default_window_days")]
    pub default_window_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Capacity of the channel feeding the recorder actor
    pub buffer_size: usize,
    /// Buffered visits that trigger an immediate flush
    pub batch_size: usize,
    pub flush_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Let any origin read the dashboard API
    pub allow_any_origin: bool,
}

impl AnalyticsConfig {
    const fn default_window_days() -> u32 {
        DEFAULT_WINDOW_DAYS
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_window_days: Self::default_window_days(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 10_000,
            batch_size: 500,
            flush_interval_ms: 1_000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            "sqlite" => DatabaseBackend::Sqlite,
            other => {
                tracing::warn!(
                    "Unknown DATABASE_BACKEND '{other}', falling back to 'sqlite'. Supported values: sqlite, postgres"
                );
                DatabaseBackend::Sqlite
            }
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./footfall.db?mode=rwc".to_string());
        let max_connections = env_or("DATABASE_MAX_CONNECTIONS", 5u32)?;

        let api_host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let api_port = env_or("API_PORT", 8080u16)?;

        let tracking_host =
            std::env::var("TRACKING_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let tracking_port = env_or("TRACKING_PORT", 3000u16)?;

        let default_window_days = env_or("ANALYTICS_WINDOW_DAYS", DEFAULT_WINDOW_DAYS)?;
        if default_window_days == 0 || default_window_days > MAX_WINDOW_DAYS {
            bail!("ANALYTICS_WINDOW_DAYS must be between 1 and {MAX_WINDOW_DAYS}, got {default_window_days}");
        }

        let recorder_defaults = RecorderConfig::default();
        let recorder = RecorderConfig {
            buffer_size: env_or("RECORDER_BUFFER_SIZE", recorder_defaults.buffer_size)?,
            batch_size: env_or("RECORDER_BATCH_SIZE", recorder_defaults.batch_size)?,
            flush_interval_ms: env_or(
                "RECORDER_FLUSH_INTERVAL_MS",
                recorder_defaults.flush_interval_ms,
            )?,
        };
        if recorder.buffer_size == 0 || recorder.batch_size == 0 || recorder.flush_interval_ms == 0
        {
            bail!("RECORDER_BUFFER_SIZE, RECORDER_BATCH_SIZE and RECORDER_FLUSH_INTERVAL_MS must be positive");
        }

        let allow_any_origin = std::env::var("CORS_ALLOW_ANY_ORIGIN")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(true);

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            tracking_server: ServerConfig {
                host: tracking_host,
                port: tracking_port,
            },
            analytics: AnalyticsConfig {
                default_window_days,
            },
            recorder,
            cors: CorsConfig { allow_any_origin },
        })
    }
}

/// Parse `key` from the environment, using `default` when it is unset
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
