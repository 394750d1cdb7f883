//! Orchestrator configuration
//!
//! Defines all configurable parameters for the orchestrator: database
//! connection, provider selection and credentials, network binding, CORS,
//! logging, and the generation step plan.

use anyhow::{Context, bail};
use forge_core::domain::job::GenerationStep;
use std::time::Duration;

use crate::provider::ProviderKind;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string; `None` selects the in-memory store
    pub database_url: Option<String>,

    /// Which LLM backend serves completions
    pub provider: ProviderKind,

    pub openrouter_api_key: Option<String>,

    pub gemini_api_key: Option<String>,

    /// Override for the provider's endpoint base URL
    pub provider_base_url: Option<String>,

    /// Upper bound on a single provider call
    pub provider_timeout: Duration,

    /// Socket address to listen on
    pub bind_addr: String,

    /// Allowed CORS origins, `*` allows any
    pub cors_origins: Vec<String>,

    /// Fallback log level when RUST_LOG is unset
    pub log_level: String,

    /// Emit JSON formatted logs
    pub log_json: bool,

    /// Append the test case step to the generation plan
    pub generate_test_cases: bool,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - DATABASE_URL (optional, in-memory store when unset)
    /// - AI_PROVIDER (optional, `openrouter` or `gemini`, default: openrouter)
    /// - OPENROUTER_API_KEY / GEMINI_API_KEY (required for the selected provider)
    /// - PROVIDER_BASE_URL (optional)
    /// - PROVIDER_TIMEOUT (optional, seconds, default: 120)
    /// - PORT (optional, default: 8080) or ORCHESTRATOR_BIND_ADDR (full address)
    /// - CORS_ORIGINS (optional, comma separated, default: http://localhost:3000)
    /// - LOG_LEVEL (optional, default: info)
    /// - LOG_FORMAT (optional, `text` or `json`)
    /// - GENERATE_TEST_CASES (optional, default: false)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let provider = get("AI_PROVIDER")
            .unwrap_or_else(|| "openrouter".to_string())
            .parse::<ProviderKind>()?;

        let provider_timeout = match get("PROVIDER_TIMEOUT") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .with_context(|| format!("PROVIDER_TIMEOUT must be whole seconds, got '{}'", raw))?,
            ),
            None => Duration::from_secs(120),
        };

        let bind_addr = match get("ORCHESTRATOR_BIND_ADDR") {
            Some(addr) => addr,
            None => format!("0.0.0.0:{}", get("PORT").unwrap_or_else(|| "8080".to_string())),
        };

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let generate_test_cases = get("GENERATE_TEST_CASES")
            .map(|raw| matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url: get("DATABASE_URL"),
            provider,
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            provider_base_url: get("PROVIDER_BASE_URL"),
            provider_timeout,
            bind_addr,
            cors_origins,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: get("LOG_FORMAT").is_some_and(|format| format.eq_ignore_ascii_case("json")),
            generate_test_cases,
        })
    }

    /// API key for the selected provider
    pub fn provider_api_key(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::OpenRouter => self.openrouter_api_key.as_deref(),
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
        }
    }

    /// Ordered steps every job goes through
    pub fn step_plan(&self) -> Vec<GenerationStep> {
        let mut plan = vec![GenerationStep::GenerateText, GenerationStep::GenerateSolution];
        if self.generate_test_cases {
            plan.push(GenerationStep::GenerateTestCases);
        }
        plan
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.provider_api_key().is_none() {
            bail!(
                "{} is required when AI_PROVIDER is '{}'",
                self.provider.api_key_var(),
                self.provider
            );
        }

        if let Some(base_url) = &self.provider_base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                bail!("PROVIDER_BASE_URL must start with http:// or https://");
            }
        }

        if self.provider_timeout.is_zero() {
            bail!("PROVIDER_TIMEOUT must be greater than 0");
        }

        if self.bind_addr.is_empty() {
            bail!("bind address cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("OPENROUTER_API_KEY", "sk-test")]).unwrap();

        assert_eq!(config.provider, ProviderKind::OpenRouter);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.provider_timeout, Duration::from_secs(120));
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert!(config.database_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_key_for_selected_provider() {
        let config = config_from(&[("AI_PROVIDER", "gemini"), ("OPENROUTER_API_KEY", "sk")]).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = config_from(&[("AI_PROVIDER", "llamafarm")]).unwrap_err();
        assert!(err.to_string().contains("llamafarm"));
    }

    #[test]
    fn test_port_and_bind_addr() {
        let config = config_from(&[("PORT", "9000")]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");

        let config = config_from(&[("PORT", "9000"), ("ORCHESTRATOR_BIND_ADDR", "127.0.0.1:7000")])
            .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7000");
    }

    #[test]
    fn test_step_plan() {
        let config = config_from(&[]).unwrap();
        assert_eq!(
            config.step_plan(),
            vec![GenerationStep::GenerateText, GenerationStep::GenerateSolution]
        );

        let config = config_from(&[("GENERATE_TEST_CASES", "true")]).unwrap();
        assert_eq!(config.step_plan().last(), Some(&GenerationStep::GenerateTestCases));
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("PROVIDER_TIMEOUT", "soon")]).is_err());

        let config = config_from(&[
            ("OPENROUTER_API_KEY", "sk"),
            ("PROVIDER_BASE_URL", "localhost:1234"),
        ])
        .unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[("OPENROUTER_API_KEY", "sk"), ("PROVIDER_TIMEOUT", "0")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_origins_split() {
        let config = config_from(&[("CORS_ORIGINS", "http://a.test, http://b.test,,")]).unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }
}
