//! Provider Module
//!
//! Uniform completion capability over interchangeable LLM backends.
//!
//! Each backend knows its endpoint, request envelope, authentication
//! convention and response shape; all of them expose the same
//! `complete(prompt, model)` contract. The backend is chosen once at startup
//! and held as a single [`Provider`] value.

mod gemini;
mod openrouter;

pub use gemini::GeminiProvider;
pub use openrouter::OpenRouterProvider;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failures of a single completion call
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider could not be reached, or the call timed out
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered successfully but without a usable completion
    #[error("provider returned no completion")]
    EmptyResponse,

    /// The request or response could not be (de)serialized
    #[error("encoding failure: {0}")]
    Encoding(String),

    #[error("prompt must not be empty")]
    EmptyPrompt,
}

/// The completion contract every backend implements
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate text for `prompt`
    ///
    /// An empty `model` selects the provider's default model. Performs
    /// exactly one outbound call and never retries.
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}

/// Supported provider kinds, selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenRouter,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unsupported AI provider '{0}' (expected 'openrouter' or 'gemini')")]
pub struct UnknownProvider(String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "gemini" => Ok(ProviderKind::Gemini),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

/// The resolved completion backend
#[derive(Debug, Clone)]
pub enum Provider {
    OpenRouter(OpenRouterProvider),
    Gemini(GeminiProvider),
}

impl Provider {
    /// Build the backend for `kind`
    ///
    /// `base_url` overrides the provider's public endpoint.
    pub fn new(
        kind: ProviderKind,
        api_key: impl Into<String>,
        base_url: Option<String>,
        client: Client,
    ) -> Self {
        match kind {
            ProviderKind::OpenRouter => {
                Provider::OpenRouter(OpenRouterProvider::new(api_key, base_url, client))
            }
            ProviderKind::Gemini => Provider::Gemini(GeminiProvider::new(api_key, base_url, client)),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenRouter(_) => ProviderKind::OpenRouter,
            Provider::Gemini(_) => ProviderKind::Gemini,
        }
    }
}

#[async_trait]
impl CompletionProvider for Provider {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        if prompt.trim().is_empty() {
            return Err(ProviderError::EmptyPrompt);
        }

        match self {
            Provider::OpenRouter(provider) => provider.complete(prompt, model).await,
            Provider::Gemini(provider) => provider.complete(prompt, model).await,
        }
    }

    fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}

// =============================================================================
// Shared HTTP helpers
// =============================================================================

/// Serialize a request envelope
fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>, ProviderError> {
    serde_json::to_vec(body)
        .map_err(|e| ProviderError::Encoding(format!("Failed to encode request: {}", e)))
}

/// Check the status of a provider response and decode its JSON body
///
/// The raw body is kept on non-success statuses for diagnostics.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Transport(format!("Failed to read response body: {}", e)))?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| ProviderError::Encoding(format!("Failed to decode response: {}", e)))
}

fn transport(err: reqwest::Error) -> ProviderError {
    ProviderError::Transport(format!("Failed to send request: {}", err))
}

/// Treat whitespace-only completions as missing
fn non_blank(text: Option<String>) -> Result<String, ProviderError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderError::EmptyResponse),
    }
}
