//! Focus Area API Handlers

use axum::{Json, extract::State};
use forge_core::domain::focus_area::FocusArea;

use crate::api::AppState;
use crate::api::error::ApiResult;

/// GET /api/v1/focus-areas
/// Active focus areas in display order
pub async fn list_focus_areas(State(state): State<AppState>) -> ApiResult<Json<Vec<FocusArea>>> {
    let areas = state.store.list_focus_areas().await?;
    Ok(Json(areas))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::spawn_app;
    use crate::store::DEFAULT_FOCUS_AREAS;

    #[tokio::test]
    async fn test_lists_seeded_focus_areas() {
        let app = spawn_app().await;
        let (_, areas) = app.get("/api/v1/focus-areas").await;

        let areas = areas.as_array().unwrap();
        assert_eq!(areas.len(), DEFAULT_FOCUS_AREAS.len());
        assert_eq!(areas[0]["slug"], DEFAULT_FOCUS_AREAS[0].1);
    }
}
