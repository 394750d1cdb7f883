//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod focus_area;
pub mod health;
pub mod job;
pub mod model;
pub mod problem;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::Generator;
use crate::store::GenerationStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GenerationStore>,
    pub generator: Arc<Generator>,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Catalog endpoints
        .route(
            "/api/v1/models",
            get(model::list_models).post(model::create_model),
        )
        .route("/api/v1/focus-areas", get(focus_area::list_focus_areas))
        // Problem endpoints
        .route(
            "/api/v1/problems",
            get(problem::list_problems).post(problem::create_problem),
        )
        .route("/api/v1/problems/{id}", get(problem::get_problem))
        .route(
            "/api/v1/problems/{id}/focus-areas",
            get(problem::get_problem_focus_areas),
        )
        .route(
            "/api/v1/problems/{id}/generation-status",
            get(problem::get_generation_status),
        )
        // Job endpoints
        .route("/api/v1/jobs", get(job::list_jobs))
        .route("/api/v1/jobs/{id}", get(job::get_job))
        .route("/api/v1/jobs/{id}/advance", post(job::advance_job))
        .route("/api/v1/jobs/{id}/run", post(job::run_job))
        // Add state and middleware
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: '{}'", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Router served on a loopback port, backed by an in-memory store and a
    //! canned provider

    use super::*;
    use crate::provider::{CompletionProvider, ProviderError};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use forge_core::domain::job::GenerationStep;
    use std::time::Duration;

    /// Answers every prompt with a fixed text
    pub struct EchoProvider;

    #[async_trait]
    impl CompletionProvider for EchoProvider {
        async fn complete(&self, prompt: &str, _model: &str) -> Result<String, ProviderError> {
            Ok(format!("generated for: {}", prompt))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    pub struct TestApp {
        pub base_url: String,
        pub store: Arc<MemoryStore>,
        client: reqwest::Client,
    }

    impl TestApp {
        pub async fn send(
            &self,
            method: reqwest::Method,
            path: &str,
            body: Option<serde_json::Value>,
        ) -> (StatusCode, serde_json::Value) {
            let mut request = self
                .client
                .request(method, format!("{}{}", self.base_url, path));
            if let Some(body) = body {
                request = request.json(&body);
            }

            let response = request.send().await.unwrap();
            let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
            let text = response.text().await.unwrap();
            let json = if text.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
            };
            (status, json)
        }

        pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
            self.send(reqwest::Method::GET, path, None).await
        }

        pub async fn post(
            &self,
            path: &str,
            body: Option<serde_json::Value>,
        ) -> (StatusCode, serde_json::Value) {
            self.send(reqwest::Method::POST, path, body).await
        }
    }

    pub async fn spawn_app() -> TestApp {
        let store = Arc::new(MemoryStore::with_default_focus_areas());
        let generator = Generator::new(
            store.clone(),
            Arc::new(EchoProvider),
            vec![GenerationStep::GenerateText, GenerationStep::GenerateSolution],
            Duration::from_secs(5),
        );
        let state = AppState {
            store: store.clone(),
            generator: Arc::new(generator),
        };
        let app = create_router(state, &["*".to_string()]);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestApp {
            base_url: format!("http://{}", addr),
            store,
            client: reqwest::Client::new(),
        }
    }
}
