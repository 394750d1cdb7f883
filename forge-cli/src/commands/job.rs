//! Job command handlers
//!
//! Handles listing, viewing and advancing generation jobs.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use forge_client::{ClientError, ForgeClient};
use forge_core::domain::job::{GenerationJob, GenerationStep, JobStatus};

use crate::config::Config;
use crate::id_resolver::resolve_job_id;
use crate::types::IdOrPrefix;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List all jobs
    List,
    /// Get job details
    Get {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Advance a job by one step
    Advance {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Advance a job until it completes or a step fails
    Run {
        /// Job ID or unambiguous prefix
        id: String,
    },
}

/// Handle job commands
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        JobCommands::List => list_jobs(&client, config).await,
        JobCommands::Get { id } => get_job(&client, config, &id).await,
        JobCommands::Advance { id } => advance_job(&client, config, &id, false).await,
        JobCommands::Run { id } => advance_job(&client, config, &id, true).await,
    }
}

/// List all jobs
async fn list_jobs(client: &ForgeClient, config: &Config) -> Result<()> {
    let jobs = client.list_jobs().await?;
    if config.print_json(&jobs)? {
        return Ok(());
    }

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            print_job_summary(&job);
        }
    }

    Ok(())
}

/// Get and display a single job
async fn get_job(client: &ForgeClient, config: &Config, id: &str) -> Result<()> {
    let uuid = resolve_job_id(client, &IdOrPrefix::parse(id)).await?;

    let job = client.get_job(uuid).await?;
    if !config.print_json(&job)? {
        print_job_details(&job);
    }

    Ok(())
}

/// Advance a job one step, or all the way
async fn advance_job(client: &ForgeClient, config: &Config, id: &str, to_end: bool) -> Result<()> {
    let uuid = resolve_job_id(client, &IdOrPrefix::parse(id)).await?;

    let result = if to_end {
        client.run_job(uuid).await
    } else {
        client.advance_job(uuid).await
    };

    let job = match result {
        Ok(job) => job,
        Err(e) if e.is_retryable() => {
            println!(
                "{}",
                format!("⚠ Job {} is being advanced by another request, try again shortly", uuid)
                    .yellow()
            );
            return Ok(());
        }
        Err(ClientError::ApiError { status: 502, message, .. }) => {
            println!("{} {}", "✗".red(), message.red());
            let job = client.get_job(uuid).await?;
            print_job_details(&job);
            anyhow::bail!("generation step failed");
        }
        Err(e) => return Err(e.into()),
    };

    if config.print_json(&job)? {
        return Ok(());
    }

    match job.status {
        JobStatus::Completed => println!("{} Job {} completed", "✓".green(), job.id),
        _ => println!(
            "{} Job {} advanced ({} step(s) done)",
            "▸".cyan(),
            job.id,
            job.completed_steps.len()
        ),
    }
    println!();
    print_job_details(&job);

    Ok(())
}

/// Print a one-entry job summary
fn print_job_summary(job: &GenerationJob) {
    println!("  {} Job {}", "▸".cyan(), job.id.to_string().dimmed());
    println!("    Problem:  {}", job.problem_id.to_string().dimmed());
    println!("    Status:   {}", colorize_status(&job.status));
    println!("    Steps:    {}", format_steps(&job.completed_steps));
    println!(
        "    Updated:  {}",
        job.updated_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print detailed job information
pub(crate) fn print_job_details(job: &GenerationJob) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.id.to_string().cyan());
    println!("  Problem ID:  {}", job.problem_id.to_string().dimmed());
    if let Some(model_id) = job.model_id {
        println!("  Model ID:    {}", model_id.to_string().dimmed());
    }
    println!("  Status:      {}", colorize_status(&job.status));
    if let Some(step) = job.current_step {
        println!("  Current:     {}", step);
    }
    println!("  Completed:   {}", format_steps(&job.completed_steps));
    println!("  Created:     {}", job.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Updated:     {}", job.updated_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(error) = &job.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }
}

fn format_steps(steps: &[GenerationStep]) -> String {
    if steps.is_empty() {
        return "-".to_string();
    }
    steps
        .iter()
        .map(GenerationStep::as_str)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Colorize job status for display
fn colorize_status(status: &JobStatus) -> colored::ColoredString {
    let status_str = status.as_str();
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::InProgress => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}
