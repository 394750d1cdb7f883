//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use forge_core::domain::job::GenerationJob;

use crate::service::GenerationError;
use crate::service::problem_service::ProblemError;
use crate::store::StoreError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict { message: String, retryable: bool },
    /// A generation step failed; the job carries the recorded failure
    StepFailed { message: String, job: Box<GenerationJob> },
    StoreError(StoreError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg })),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::Conflict { message, retryable } => (
                StatusCode::CONFLICT,
                serde_json::json!({ "error": message, "retryable": retryable }),
            ),
            ApiError::StepFailed { message, job } => (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({ "error": message, "job": job }),
            ),
            ApiError::StoreError(err) => {
                tracing::error!("Store error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::Conflict(message) => ApiError::Conflict {
                message,
                retryable: false,
            },
            other => ApiError::StoreError(other),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            GenerationError::LeaseConflict(_) => ApiError::Conflict {
                message: err.to_string(),
                retryable: true,
            },
            GenerationError::StepFailed { job, step, source } => ApiError::StepFailed {
                message: format!("Step {} failed: {}", step, source),
                job,
            },
            GenerationError::Persistence(err) => ApiError::StoreError(err),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<ProblemError> for ApiError {
    fn from(err: ProblemError) -> Self {
        match err {
            ProblemError::NotFound(id) => ApiError::NotFound(format!("Problem {} not found", id)),
            ProblemError::ModelNotFound(id) => {
                ApiError::NotFound(format!("Model {} not found", id))
            }
            ProblemError::NoJob(id) => {
                ApiError::NotFound(format!("No generation job for problem {}", id))
            }
            ProblemError::StoreError(err) => err.into(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
