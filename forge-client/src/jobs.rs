//! Job-related API endpoints

use crate::ForgeClient;
use crate::error::Result;
use forge_core::domain::job::GenerationJob;
use uuid::Uuid;

impl ForgeClient {
    /// List all generation jobs, newest first
    pub async fn list_jobs(&self) -> Result<Vec<GenerationJob>> {
        let response = self.client.get(self.url("/api/v1/jobs")).send().await?;

        self.handle_response(response).await
    }

    /// Get a job by ID
    ///
    /// # Arguments
    /// * `job_id` - The job UUID
    pub async fn get_job(&self, job_id: Uuid) -> Result<GenerationJob> {
        let url = self.url(&format!("/api/v1/jobs/{}", job_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Advance a job by one step
    ///
    /// A job already being advanced elsewhere yields a retryable conflict
    /// (`ClientError::is_retryable`). A failed step yields a 502 whose
    /// message names the step and the cause.
    ///
    /// # Returns
    /// The job after the step
    pub async fn advance_job(&self, job_id: Uuid) -> Result<GenerationJob> {
        let url = self.url(&format!("/api/v1/jobs/{}/advance", job_id));
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    /// Advance a job until it completes or a step fails
    ///
    /// # Returns
    /// The completed job
    pub async fn run_job(&self, job_id: Uuid) -> Result<GenerationJob> {
        let url = self.url(&format!("/api/v1/jobs/{}/run", job_id));
        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }
}
