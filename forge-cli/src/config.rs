//! Configuration module
//!
//! Handles CLI configuration including orchestrator URL and output format.

use forge_client::ForgeClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the orchestrator service
    pub orchestrator_url: String,

    /// Print raw JSON responses
    pub json: bool,
}

impl Config {
    pub fn client(&self) -> ForgeClient {
        ForgeClient::new(&self.orchestrator_url)
    }

    /// Print `value` as pretty JSON when JSON output was requested
    ///
    /// Returns `true` when the value was printed.
    pub fn print_json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<bool> {
        if !self.json {
            return Ok(false);
        }
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(true)
    }
}
