use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::analytics::AnalyticsEngine;
use crate::config::{AnalyticsConfig, CorsConfig};

use super::analytics::get_visitor_statistics;
use super::handlers::{health_check, ApiState};

pub fn create_api_router(
    engine: AnalyticsEngine,
    analytics: &AnalyticsConfig,
    cors: &CorsConfig,
) -> Router {
    let state = Arc::new(ApiState {
        engine,
        default_window_days: analytics.default_window_days,
    });

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/analytics/visitors", get(get_visitor_statistics))
        .with_state(state);

    if cors.allow_any_origin {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
