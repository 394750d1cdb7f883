//! ID resolver module
//!
//! Handles resolution of UUID prefixes to full UUIDs by querying the API.
//! This allows users to specify short, unambiguous prefixes instead of full UUIDs.

use anyhow::{Context, Result, anyhow};
use forge_client::ForgeClient;
use uuid::Uuid;

use crate::types::IdOrPrefix;

/// Resolve a problem ID or prefix to a full UUID
///
/// If the input is already a full UUID, returns it immediately.
/// Otherwise, fetches all problem ids and finds the one matching the prefix.
pub async fn resolve_problem_id(client: &ForgeClient, id_or_prefix: &IdOrPrefix) -> Result<Uuid> {
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let ids = client
        .list_problems()
        .await
        .context("Failed to fetch problems for ID resolution")?;

    pick_unique("problem", id_or_prefix, ids)
}

/// Resolve a job ID or prefix to a full UUID
///
/// If the input is already a full UUID, returns it immediately.
/// Otherwise, fetches all jobs and finds the one matching the prefix.
pub async fn resolve_job_id(client: &ForgeClient, id_or_prefix: &IdOrPrefix) -> Result<Uuid> {
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let jobs = client
        .list_jobs()
        .await
        .context("Failed to fetch jobs for ID resolution")?;

    pick_unique("job", id_or_prefix, jobs.iter().map(|j| j.id))
}

/// Resolve a model ID or prefix to a full UUID
pub async fn resolve_model_id(client: &ForgeClient, id_or_prefix: &IdOrPrefix) -> Result<Uuid> {
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let models = client
        .list_models()
        .await
        .context("Failed to fetch models for ID resolution")?;

    pick_unique("model", id_or_prefix, models.iter().map(|m| m.id))
}

/// Select the single id matching `id_or_prefix`
///
/// # Errors
/// Returns an error if no id matches, or if several do (ambiguous prefix)
fn pick_unique(
    kind: &str,
    id_or_prefix: &IdOrPrefix,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<Uuid> {
    let matches: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| id_or_prefix.matches(*id))
        .collect();

    match matches.len() {
        0 => Err(anyhow!(
            "No {} found with ID starting with '{}'",
            kind,
            id_or_prefix
        )),
        1 => Ok(matches[0]),
        _ => {
            let ids: Vec<String> = matches.iter().map(Uuid::to_string).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple {}s: {}",
                id_or_prefix,
                kind,
                ids.join(", ")
            ))
        }
    }
}
