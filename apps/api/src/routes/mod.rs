pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", post(handlers::handle_analyze))
        .route("/api/v1/analysis/parse", post(handlers::handle_parse))
        .route("/api/v1/analysis/upload", post(handlers::handle_upload))
        .route("/api/v1/analysis/report", post(handlers::handle_report))
        .with_state(state)
}
