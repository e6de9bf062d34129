//! Visit tracking endpoint and buffered writer

pub mod handlers;
pub mod recorder;
pub mod routes;

pub use recorder::VisitRecorder;
pub use routes::create_tracking_router;
