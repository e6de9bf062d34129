use axum::Json;
use serde::Serialize;

use crate::analytics::AnalyticsEngine;

pub struct ApiState {
    pub engine: AnalyticsEngine,
    pub default_window_days: u32,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
