//! Problem API Handlers
//!
//! HTTP endpoints for creating problems and reading their generated content.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use forge_core::domain::focus_area::FocusArea;
use forge_core::domain::job::GenerationJob;
use forge_core::dto::problem::{CreateProblem, CreateProblemResponse, ProblemWithTestCases};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::problem_service;

#[derive(Debug, Deserialize)]
pub struct CreateProblemQuery {
    #[serde(rename = "autoGenerate", default)]
    pub auto_generate: bool,
}

/// POST /api/v1/problems
/// Create a shell problem and its generation job
///
/// With `autoGenerate=true` the job is run to completion in the background.
pub async fn create_problem(
    State(state): State<AppState>,
    Query(query): Query<CreateProblemQuery>,
    Json(req): Json<CreateProblem>,
) -> ApiResult<(StatusCode, Json<CreateProblemResponse>)> {
    tracing::info!(
        "Creating problem with {} focus areas",
        req.focus_area_ids.len()
    );

    let created = problem_service::create_problem_and_job(state.store.as_ref(), req).await?;

    if query.auto_generate {
        let generator = state.generator.clone();
        let job_id = created.job_id;

        tokio::spawn(async move {
            match generator.run_to_completion(job_id).await {
                Ok(_) => tracing::info!("Background generation finished for job {}", job_id),
                Err(e) => tracing::warn!("Background generation stopped for job {}: {}", job_id, e),
            }
        });
    }

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/problems
/// List problem ids, newest first
pub async fn list_problems(State(state): State<AppState>) -> ApiResult<Json<Vec<Uuid>>> {
    tracing::debug!("Listing problems");

    let ids = problem_service::list_problem_ids(state.store.as_ref()).await?;
    Ok(Json(ids))
}

/// GET /api/v1/problems/{id}
/// Get a problem with its test cases
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProblemWithTestCases>> {
    tracing::debug!("Getting problem: {}", id);

    let problem = problem_service::get_problem(state.store.as_ref(), id).await?;
    Ok(Json(problem))
}

/// GET /api/v1/problems/{id}/focus-areas
pub async fn get_problem_focus_areas(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<FocusArea>>> {
    let areas = problem_service::get_focus_areas(state.store.as_ref(), id).await?;
    Ok(Json(areas))
}

/// GET /api/v1/problems/{id}/generation-status
/// Latest generation job for the problem
pub async fn get_generation_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GenerationJob>> {
    let job = problem_service::generation_status(state.store.as_ref(), id).await?;
    Ok(Json(job))
}
