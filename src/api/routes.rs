//! API route definitions
//!
//! - /api/v1/decision - Pump decision (GET query string or POST JSON)
//! - /api/v1/schema - Feature layout expected by the classifier
//! - /api/v1/config - Active rule thresholds and input ranges
//! - /api/v1/artifacts/reload - Re-read artifacts from disk

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AdvisorState};

/// Create all JSON API routes
pub fn api_routes(state: AdvisorState) -> Router {
    Router::new()
        .route(
            "/decision",
            get(handlers::get_decision).post(handlers::post_decision),
        )
        .route("/schema", get(handlers::get_schema))
        .route("/config", get(handlers::get_config))
        .route("/artifacts/reload", post(handlers::reload_artifacts))
        .with_state(state)
}

/// Dashboard page and health endpoint at root level
pub fn root_routes(state: AdvisorState) -> Router {
    Router::new()
        .route("/", get(super::dashboard::serve_dashboard))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
