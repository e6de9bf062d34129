use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers::{health_check, track_visit, TrackingState};
use super::recorder::VisitRecorder;

pub fn create_tracking_router(recorder: Arc<VisitRecorder>) -> Router {
    let state = Arc::new(TrackingState { recorder });

    Router::new()
        .route("/", get(health_check))
        .route("/visits", post(track_visit))
        .with_state(state)
}
