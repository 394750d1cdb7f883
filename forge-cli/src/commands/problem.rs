//! Problem command handlers
//!
//! Handles problem creation and viewing generated content.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use forge_client::ForgeClient;
use forge_core::dto::problem::{CreateProblem, ProblemWithTestCases};

use super::job::print_job_details;
use crate::config::Config;
use crate::id_resolver::{resolve_model_id, resolve_problem_id};
use crate::types::IdOrPrefix;

/// Problem subcommands
#[derive(Subcommand)]
pub enum ProblemCommands {
    /// Create a problem and queue its generation job
    Create {
        /// Focus area ID (repeatable)
        #[arg(short, long = "focus-area")]
        focus_area: Vec<String>,

        /// Model ID or unambiguous prefix
        #[arg(short, long)]
        model: Option<String>,

        /// Generate in the background right away
        #[arg(long)]
        auto: bool,
    },
    /// List problem ids, newest first
    List,
    /// Get a problem with its test cases
    Get {
        /// Problem ID or unambiguous prefix
        id: String,
    },
    /// Show the latest generation job of a problem
    Status {
        /// Problem ID or unambiguous prefix
        id: String,
    },
}

/// Handle problem commands
pub async fn handle_problem_command(command: ProblemCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        ProblemCommands::Create {
            focus_area,
            model,
            auto,
        } => create_problem(&client, config, focus_area, model, auto).await,
        ProblemCommands::List => list_problems(&client, config).await,
        ProblemCommands::Get { id } => get_problem(&client, config, &id).await,
        ProblemCommands::Status { id } => problem_status(&client, config, &id).await,
    }
}

async fn create_problem(
    client: &ForgeClient,
    config: &Config,
    focus_area_ids: Vec<String>,
    model: Option<String>,
    auto: bool,
) -> Result<()> {
    let model_id = match model {
        Some(model) => Some(resolve_model_id(client, &IdOrPrefix::parse(&model)).await?),
        None => None,
    };

    let created = client
        .create_problem(
            CreateProblem {
                focus_area_ids,
                model_id,
            },
            auto,
        )
        .await?;

    if config.print_json(&created)? {
        return Ok(());
    }

    println!("{} Problem created", "✓".green());
    println!("  Problem ID: {}", created.problem_id.to_string().cyan());
    println!("  Job ID:     {}", created.job_id.to_string().cyan());
    if auto {
        println!("{}", "  Generation started in the background.".dimmed());
    } else {
        println!(
            "{}",
            format!("  Run `forge job run {}` to generate it.", created.job_id).dimmed()
        );
    }

    Ok(())
}

async fn list_problems(client: &ForgeClient, config: &Config) -> Result<()> {
    let ids = client.list_problems().await?;
    if config.print_json(&ids)? {
        return Ok(());
    }

    if ids.is_empty() {
        println!("{}", "No problems found.".yellow());
    } else {
        println!("{}", format!("Found {} problem(s):", ids.len()).bold());
        for id in ids {
            println!("  {} {}", "▸".cyan(), id);
        }
    }

    Ok(())
}

async fn get_problem(client: &ForgeClient, config: &Config, id: &str) -> Result<()> {
    let uuid = resolve_problem_id(client, &IdOrPrefix::parse(id)).await?;

    let problem = client.get_problem(uuid).await?;
    if !config.print_json(&problem)? {
        print_problem(&problem);
    }

    Ok(())
}

async fn problem_status(client: &ForgeClient, config: &Config, id: &str) -> Result<()> {
    let uuid = resolve_problem_id(client, &IdOrPrefix::parse(id)).await?;

    let job = client.get_generation_status(uuid).await?;
    if !config.print_json(&job)? {
        print_job_details(&job);
    }

    Ok(())
}

fn print_problem(problem: &ProblemWithTestCases) {
    let p = &problem.problem;

    println!("{}", "Problem Details:".bold());
    println!("  ID:       {}", p.id.to_string().cyan());
    println!("  Owner:    {}", p.generated_by_user_id);
    if let Some(model_id) = p.generated_by_model_id {
        println!("  Model ID: {}", model_id.to_string().dimmed());
    }
    println!("  Created:  {}", p.created_at.format("%Y-%m-%d %H:%M:%S"));

    println!("\n{}", "Statement:".bold());
    if p.problem_text.is_empty() {
        println!("{}", "(not generated yet)".dimmed());
    } else {
        println!("{}", p.problem_text);
    }

    println!("\n{}", "Solution:".bold());
    match &p.solution {
        Some(solution) => println!("{}", solution),
        None => println!("{}", "(not generated yet)".dimmed()),
    }

    if !problem.test_cases.is_empty() {
        println!("\n{}", format!("Test Cases ({}):", problem.test_cases.len()).bold());
        for case in &problem.test_cases {
            let mut flags = Vec::new();
            if case.is_sample_case {
                flags.push("sample");
            }
            if case.is_edge_case {
                flags.push("edge");
            }
            let flags = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };

            println!("  {} {}{}", "▸".cyan(), case.description, flags.dimmed());
            println!("    input:    {}", case.input);
            println!("    expected: {}", case.expected);
        }
    }
}
