//! Focus area command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Focus area subcommands
#[derive(Subcommand)]
pub enum FocusAreaCommands {
    /// List active focus areas
    List,
}

/// Handle focus area commands
pub async fn handle_focus_area_command(command: FocusAreaCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        FocusAreaCommands::List => {
            let areas = client.list_focus_areas().await?;
            if config.print_json(&areas)? {
                return Ok(());
            }

            if areas.is_empty() {
                println!("{}", "No focus areas found.".yellow());
            }
            for area in areas {
                println!("  {} {} ({})", "▸".cyan(), area.name.bold(), area.slug);
                println!("    ID:       {}", area.id.to_string().dimmed());
                if let Some(description) = &area.description {
                    println!("    {}", description);
                }
            }
        }
    }

    Ok(())
}
