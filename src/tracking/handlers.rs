use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::recorder::VisitRecorder;
use crate::models::NewVisit;

/// Longest accepted `pageType` or `visitorKey`, in bytes
pub const MAX_FIELD_LEN: usize = 128;

pub struct TrackingState {
    pub recorder: Arc<VisitRecorder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackVisitRequest {
    pub page_type: String,
    #[serde(default)]
    pub visitor_key: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

fn bad_request(error: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Record one page visit, stamped with the time it was received
pub async fn track_visit(
    State(state): State<Arc<TrackingState>>,
    Json(payload): Json<TrackVisitRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>), (StatusCode, Json<ErrorResponse>)> {
    let page_type = payload.page_type.trim();
    if page_type.is_empty() {
        return Err(bad_request("pageType cannot be empty"));
    }
    if page_type.len() > MAX_FIELD_LEN {
        return Err(bad_request("pageType is too long"));
    }

    let visitor_key = payload
        .visitor_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty());
    if visitor_key.as_ref().is_some_and(|key| key.len() > MAX_FIELD_LEN) {
        return Err(bad_request("visitorKey is too long"));
    }

    let visit = NewVisit::new(Utc::now(), page_type, visitor_key);

    if state.recorder.record(visit) {
        Ok((
            StatusCode::ACCEPTED,
            Json(SuccessResponse {
                message: "Visit recorded".to_string(),
            }),
        ))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Visit could not be recorded, try again later".to_string(),
            }),
        ))
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
