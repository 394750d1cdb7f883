//! Forge HTTP Client
//!
//! Typed access to the orchestrator's problem, job and catalog routes.
//! Error bodies are decoded into [`ClientError`], keeping the orchestrator's
//! `retryable` hint so callers can tell a busy job from a failed one.
//!
//! ```no_run
//! use forge_client::ForgeClient;
//! use forge_core::dto::problem::CreateProblem;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ForgeClient::new("http://localhost:8080");
//!
//!     let created = client.create_problem(CreateProblem::default(), false).await?;
//!     let job = client.run_job(created.job_id).await?;
//!
//!     println!("Job {} is {}", job.id, job.status);
//!     Ok(())
//! }
//! ```

pub mod error;
mod catalog;
mod jobs;
mod problems;

pub use error::{ClientError, Result};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Handle on one orchestrator
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ForgeClient {
    base_url: String,
    client: Client,
}

impl ForgeClient {
    /// Client for the orchestrator at `base_url`, e.g. `http://localhost:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Client reusing a preconfigured `reqwest::Client` (timeouts, proxies)
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<()> {
        let response = self.client.get(self.url("/health")).send().await?;
        self.error_for_status(response).await.map(drop)
    }

    /// Decode a JSON body, or the orchestrator's error body
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let response = self.error_for_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    async fn error_for_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::debug!("Orchestrator answered {} for {}: {}", status, url, body);

        Err(ClientError::from_body(status.as_u16(), &body))
    }
}
