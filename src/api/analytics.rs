//! Visitor analytics API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::handlers::{ApiState, ErrorResponse};
use crate::analytics::{AnalyticsError, AnalyticsSummary};

/// Message shown for every failed query; the cause is only logged
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load visitor analytics. Please try again.";

#[derive(Debug, Deserialize)]
pub struct VisitorStatisticsParams {
    /// Window size in days (defaults to the configured window)
    pub days: Option<u32>,
}

/// Get visitor statistics for the trailing window ending today
pub async fn get_visitor_statistics(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<VisitorStatisticsParams>,
) -> Result<Json<AnalyticsSummary>, (StatusCode, Json<ErrorResponse>)> {
    let days = params.days.unwrap_or(state.default_window_days);

    match state.engine.get_visitor_statistics(days).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e @ AnalyticsError::InvalidWindow { .. }) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e) => {
            tracing::error!(kind = e.kind(), "Failed to get visitor statistics: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: LOAD_FAILED_MESSAGE.to_string(),
                }),
            ))
        }
    }
}
