//! Model API Handlers

use axum::{Json, extract::State, http::StatusCode};
use forge_core::domain::model::Model;
use forge_core::dto::model::CreateModel;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// GET /api/v1/models
pub async fn list_models(State(state): State<AppState>) -> ApiResult<Json<Vec<Model>>> {
    let models = state.store.list_models().await?;
    Ok(Json(models))
}

/// POST /api/v1/models
/// Register a model name usable as a provider model identifier
pub async fn create_model(
    State(state): State<AppState>,
    Json(req): Json<CreateModel>,
) -> ApiResult<(StatusCode, Json<Model>)> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Model name cannot be empty".to_string()));
    }

    let model = state.store.create_model(name).await?;
    tracing::info!("Model registered: {} ({})", model.name, model.id);

    Ok((StatusCode::CREATED, Json(model)))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::spawn_app;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_list_models() {
        let app = spawn_app().await;

        let (status, model) = app
            .post("/api/v1/models", Some(json!({ "name": "google/gemini-flash-1.5" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(model["name"], "google/gemini-flash-1.5");

        let (status, body) = app
            .post("/api/v1/models", Some(json!({ "name": "google/gemini-flash-1.5" })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["retryable"], false);

        let (_, models) = app.get("/api/v1/models").await;
        assert_eq!(models.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let app = spawn_app().await;
        let (status, _) = app.post("/api/v1/models", Some(json!({ "name": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
