//! JSON envelope shared by every `/api/v1` endpoint.
//!
//! Success bodies are `{ "data": T, "meta": {...} }`. Failures go through
//! [`ApiError`], which maps each domain error to a status code and a stable
//! machine-readable code inside `{ "error": {...}, "meta": {...} }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::engine::ArtifactLoadError;
use crate::model::InferenceError;
use crate::types::InputError;

/// API version reported in every envelope.
pub const API_VERSION: &str = "1";

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub version: &'static str,
}

impl ResponseMeta {
    fn now() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: API_VERSION,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::now(),
        };
        (StatusCode::OK, axum::Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

/// Every way an API request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Query string or JSON body could not be deserialized.
    #[error("{0}")]
    Malformed(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    /// Artifacts on disk are unusable; the previous bundle is still serving.
    #[error(transparent)]
    Reload(#[from] ArtifactLoadError),

    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Malformed(_) | Self::Input(_) => StatusCode::BAD_REQUEST,
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Reload(_) | Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "BAD_REQUEST",
            Self::Input(_) => "INVALID_INPUT",
            Self::Inference(_) => "INFERENCE_FAILED",
            Self::Reload(_) => "ARTIFACTS_INVALID",
            Self::Unavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.to_string(),
            },
            meta: ResponseMeta::now(),
        };
        (self.status(), axum::Json(body)).into_response()
    }
}
