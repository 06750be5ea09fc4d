//! Pump decision endpoints

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use super::AdvisorState;
use crate::api::envelope::{ApiError, ApiResponse};
use crate::types::ReadingInput;

/// GET /api/v1/decision - Decide from query parameters
///
/// Missing parameters take the dashboard defaults, e.g.
/// `/api/v1/decision?temperature=35&soil_moisture=300&crop=rice`.
pub async fn get_decision(
    State(state): State<AdvisorState>,
    query: Result<Query<ReadingInput>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(input)) => decide(&state, &input),
        Err(rejection) => ApiError::Malformed(rejection.body_text()).into_response(),
    }
}

/// POST /api/v1/decision - Decide from a JSON body
pub async fn post_decision(
    State(state): State<AdvisorState>,
    body: Result<Json<ReadingInput>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(input)) => decide(&state, &input),
        Err(rejection) => ApiError::Malformed(rejection.body_text()).into_response(),
    }
}

fn decide(state: &AdvisorState, input: &ReadingInput) -> Response {
    match evaluate(state, input) {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

fn evaluate(state: &AdvisorState, input: &ReadingInput) -> Result<Response, ApiError> {
    let reading = input.validate(&state.config.inputs)?;
    let report = state
        .engine()
        .evaluate(&reading)
        .inspect_err(|e| error!(error = %e, "Inference failed"))?;
    info!(
        pump = report.decision.pump,
        source = ?report.decision.source,
        raw = report.raw_prediction,
        "Decision served"
    );
    Ok(ApiResponse::ok(report))
}
