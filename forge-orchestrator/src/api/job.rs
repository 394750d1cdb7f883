//! Job API Handlers
//!
//! HTTP endpoints for inspecting and advancing generation jobs.

use axum::{
    Json,
    extract::{Path, State},
};
use forge_core::domain::job::GenerationJob;
use uuid::Uuid;

use crate::api::AppState;
use crate::api::error::ApiResult;

/// GET /api/v1/jobs
/// List all jobs, newest first
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<GenerationJob>>> {
    tracing::debug!("Listing all jobs");

    let jobs = state.store.list_jobs().await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/{id}
/// Get job details by ID
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GenerationJob>> {
    tracing::debug!("Getting job: {}", id);

    let job = state.generator.get_job(id).await?;
    Ok(Json(job))
}

/// POST /api/v1/jobs/{id}/advance
/// Advance a job by one step
pub async fn advance_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GenerationJob>> {
    tracing::info!("Advancing job: {}", id);

    let job = state.generator.advance(id).await?;
    Ok(Json(job))
}

/// POST /api/v1/jobs/{id}/run
/// Advance a job until it completes or a step fails
pub async fn run_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GenerationJob>> {
    tracing::info!("Running job to completion: {}", id);

    let job = state.generator.run_to_completion(id).await?;
    Ok(Json(job))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::spawn_app;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn create(app: &crate::api::testing::TestApp) -> (String, String) {
        let (_, created) = app.post("/api/v1/problems", Some(json!({}))).await;
        (
            created["problem_id"].as_str().unwrap().to_string(),
            created["job_id"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_advance_step_by_step() {
        let app = spawn_app().await;
        let (problem_id, job_id) = create(&app).await;

        let (status, job) = app.post(&format!("/api/v1/jobs/{}/advance", job_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job["status"], "in_progress");
        assert_eq!(job["completed_steps"], json!(["generate_text"]));

        let (_, job) = app.post(&format!("/api/v1/jobs/{}/advance", job_id), None).await;
        assert_eq!(job["status"], "completed");
        assert_eq!(job["completed_steps"], json!(["generate_text", "generate_solution"]));
        assert!(job["current_step"].is_null());

        let (_, problem) = app.get(&format!("/api/v1/problems/{}", problem_id)).await;
        assert!(problem["problem_text"]
            .as_str()
            .unwrap()
            .starts_with("generated for: Generate a coding interview problem"));
        assert!(problem["solution"].as_str().unwrap().contains("Provide only the code."));
    }

    #[tokio::test]
    async fn test_run_and_get() {
        let app = spawn_app().await;
        let (_, job_id) = create(&app).await;

        let (status, job) = app.post(&format!("/api/v1/jobs/{}/run", job_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job["status"], "completed");

        let (status, fetched) = app.get(&format!("/api/v1/jobs/{}", job_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, job);

        let (_, jobs) = app.get("/api/v1/jobs").await;
        assert_eq!(jobs.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let app = spawn_app().await;
        let path = format!("/api/v1/jobs/{}/advance", uuid::Uuid::new_v4());

        let (status, _) = app.post(&path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.get("/api/v1/jobs/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
