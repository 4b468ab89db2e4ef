// Route table for the testsmith API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/synthesize", post(handlers::synthesize))
        .route("/synthesize/judge", post(handlers::synthesize_judge))
        .route("/run", post(handlers::run))
        .route("/extract", post(handlers::extract_results))
        .route("/resolve", post(handlers::resolve))
}
