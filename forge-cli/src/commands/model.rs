//! Model command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Model subcommands
#[derive(Subcommand)]
pub enum ModelCommands {
    /// List registered models
    List,
    /// Register a model by its provider identifier
    Create {
        /// Provider model identifier, e.g. `anthropic/claude-3.5-sonnet`
        name: String,
    },
}

/// Handle model commands
pub async fn handle_model_command(command: ModelCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        ModelCommands::List => {
            let models = client.list_models().await?;
            if config.print_json(&models)? {
                return Ok(());
            }

            if models.is_empty() {
                println!("{}", "No models registered.".yellow());
            }
            for model in models {
                println!("  {} {} {}", "▸".cyan(), model.name.bold(), model.id.to_string().dimmed());
            }
        }
        ModelCommands::Create { name } => {
            let model = client.create_model(&name).await?;
            if !config.print_json(&model)? {
                println!("{} Model registered: {} ({})", "✓".green(), model.name, model.id);
            }
        }
    }

    Ok(())
}
