//! Problem-related API endpoints

use crate::ForgeClient;
use crate::error::Result;
use forge_core::domain::focus_area::FocusArea;
use forge_core::domain::job::GenerationJob;
use forge_core::dto::problem::{CreateProblem, CreateProblemResponse, ProblemWithTestCases};
use uuid::Uuid;

impl ForgeClient {
    /// Create a problem together with its generation job
    ///
    /// # Arguments
    /// * `req` - Focus area ids and optional model
    /// * `auto_generate` - Run the job to completion in the background
    ///
    /// # Returns
    /// The new problem and job ids
    ///
    /// # Example
    /// ```no_run
    /// # use forge_client::ForgeClient;
    /// # use forge_core::dto::problem::CreateProblem;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = ForgeClient::new("http://localhost:8080");
    /// let created = client.create_problem(CreateProblem {
    ///     focus_area_ids: vec!["5b0f8a0e-6d1c-4c5e-9a5e-1c2f3d4e5f60".to_string()],
    ///     model_id: None,
    /// }, true).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_problem(
        &self,
        req: CreateProblem,
        auto_generate: bool,
    ) -> Result<CreateProblemResponse> {
        let response = self
            .client
            .post(self.url("/api/v1/problems"))
            .query(&[("autoGenerate", auto_generate)])
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List problem ids, newest first
    pub async fn list_problems(&self) -> Result<Vec<Uuid>> {
        let response = self.client.get(self.url("/api/v1/problems")).send().await?;

        self.handle_response(response).await
    }

    /// Get a problem with its test cases
    ///
    /// # Arguments
    /// * `problem_id` - The problem UUID
    pub async fn get_problem(&self, problem_id: Uuid) -> Result<ProblemWithTestCases> {
        let url = self.url(&format!("/api/v1/problems/{}", problem_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the focus areas linked to a problem
    pub async fn get_problem_focus_areas(&self, problem_id: Uuid) -> Result<Vec<FocusArea>> {
        let url = self.url(&format!("/api/v1/problems/{}/focus-areas", problem_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the latest generation job of a problem
    pub async fn get_generation_status(&self, problem_id: Uuid) -> Result<GenerationJob> {
        let url = self.url(&format!("/api/v1/problems/{}/generation-status", problem_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
