//! Model and focus area endpoints

use crate::ForgeClient;
use crate::error::Result;
use forge_core::domain::focus_area::FocusArea;
use forge_core::domain::model::Model;
use forge_core::dto::model::CreateModel;

impl ForgeClient {
    /// List registered models
    pub async fn list_models(&self) -> Result<Vec<Model>> {
        let response = self.client.get(self.url("/api/v1/models")).send().await?;

        self.handle_response(response).await
    }

    /// Register a model
    ///
    /// # Arguments
    /// * `name` - Provider model identifier, e.g. `openai/gpt-4o`
    pub async fn create_model(&self, name: &str) -> Result<Model> {
        let response = self
            .client
            .post(self.url("/api/v1/models"))
            .json(&CreateModel {
                name: name.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List active focus areas
    pub async fn list_focus_areas(&self) -> Result<Vec<FocusArea>> {
        let response = self.client.get(self.url("/api/v1/focus-areas")).send().await?;

        self.handle_response(response).await
    }
}
