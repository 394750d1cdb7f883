//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod focus_area;
mod job;
mod model;
mod problem;

pub use focus_area::FocusAreaCommands;
pub use job::JobCommands;
pub use model::ModelCommands;
pub use problem::ProblemCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Problem creation and inspection
    Problem {
        #[command(subcommand)]
        command: ProblemCommands,
    },
    /// Generation job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Model registry
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },
    /// Focus area catalog
    FocusArea {
        #[command(subcommand)]
        command: FocusAreaCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Problem { command } => problem::handle_problem_command(command, config).await,
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Model { command } => model::handle_model_command(command, config).await,
        Commands::FocusArea { command } => {
            focus_area::handle_focus_area_command(command, config).await
        }
    }
}
