//! Health, schema, config and artifact reload endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::info;

use super::AdvisorState;
use crate::api::envelope::{ApiError, ApiResponse};
use crate::engine::RuleThresholds;
use crate::features::{BASELINE_CROP, NUMERIC_COLUMNS};
use crate::types::{Crop, InputRanges};

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: i64,
    pub artifacts_loaded_at: String,
    pub model_kind: &'static str,
}

/// GET /health - Liveness plus artifact freshness
pub async fn health_check(State(state): State<AdvisorState>) -> Json<HealthResponse> {
    let bundle = state.registry.current();
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: (chrono::Utc::now() - state.started_at).num_seconds(),
        artifacts_loaded_at: bundle.loaded_at().to_rfc3339(),
        model_kind: bundle.model().kind(),
    })
}

// ============================================================================
// Schema
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    /// Feature columns in model order
    pub columns: Vec<String>,
    pub numeric_columns: Vec<&'static str>,
    pub crops: Vec<&'static str>,
    /// Crop encoded as all-zero one-hot columns
    pub baseline_crop: &'static str,
    pub model_kind: &'static str,
    pub scaler_kind: &'static str,
}

/// GET /api/v1/schema - Feature layout the classifier expects
pub async fn get_schema(State(state): State<AdvisorState>) -> Response {
    let bundle = state.registry.current();
    ApiResponse::ok(SchemaResponse {
        columns: bundle.schema().columns().to_vec(),
        numeric_columns: NUMERIC_COLUMNS.to_vec(),
        crops: Crop::ALL.iter().map(|c| c.as_str()).collect(),
        baseline_crop: BASELINE_CROP.as_str(),
        model_kind: bundle.model().kind(),
        scaler_kind: bundle.scaler().kind(),
    })
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ConfigResponse<'a> {
    pub rules: &'a RuleThresholds,
    pub inputs: &'a InputRanges,
}

/// GET /api/v1/config - Active rule thresholds and input ranges
pub async fn get_config(State(state): State<AdvisorState>) -> Response {
    ApiResponse::ok(ConfigResponse {
        rules: &state.config.rules,
        inputs: &state.config.inputs,
    })
}

// ============================================================================
// Artifact Reload
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub loaded_at: String,
    pub model_kind: &'static str,
    pub n_features: usize,
}

/// POST /api/v1/artifacts/reload - Re-read artifacts from disk
///
/// On failure the previous artifacts stay active and 503 is returned with
/// the load error.
pub async fn reload_artifacts(State(state): State<AdvisorState>) -> Response {
    info!(paths = ?state.registry.paths(), "Artifact reload requested");
    let registry = Arc::clone(&state.registry);
    match tokio::task::spawn_blocking(move || registry.reload()).await {
        Ok(Ok(bundle)) => ApiResponse::ok(ReloadResponse {
            loaded_at: bundle.loaded_at().to_rfc3339(),
            model_kind: bundle.model().kind(),
            n_features: bundle.schema().len(),
        }),
        Ok(Err(e)) => ApiError::from(e).into_response(),
        Err(e) => ApiError::Unavailable(format!("reload task failed: {e}")).into_response(),
    }
}
