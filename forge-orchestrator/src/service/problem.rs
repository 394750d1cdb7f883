//! Problem Service
//!
//! Problem creation and the read side of the problem API.

use forge_core::domain::focus_area::FocusArea;
use forge_core::domain::job::GenerationJob;
use forge_core::domain::problem::NewProblem;
use forge_core::dto::problem::{CreateProblem, CreateProblemResponse, ProblemWithTestCases};
use uuid::Uuid;

use crate::store::{GenerationStore, StoreError};

/// Owner recorded on problems until users exist
pub const DEFAULT_USER_ID: &str = "default-user";

/// Service error type
#[derive(Debug)]
pub enum ProblemError {
    NotFound(Uuid),
    ModelNotFound(Uuid),
    NoJob(Uuid),
    StoreError(StoreError),
}

impl From<StoreError> for ProblemError {
    fn from(err: StoreError) -> Self {
        ProblemError::StoreError(err)
    }
}

/// Create a shell problem, link its focus areas and queue a generation job
///
/// Focus area ids that do not parse are skipped, not rejected. A model id,
/// when given, must exist; it is checked before anything is written.
pub async fn create_problem_and_job(
    store: &dyn GenerationStore,
    req: CreateProblem,
) -> Result<CreateProblemResponse, ProblemError> {
    if let Some(model_id) = req.model_id {
        store
            .get_model(model_id)
            .await?
            .ok_or(ProblemError::ModelNotFound(model_id))?;
    }

    let problem = store
        .create_problem(NewProblem {
            generated_by_user_id: DEFAULT_USER_ID.to_string(),
            easier_than: None,
            harder_than: None,
        })
        .await?;

    let focus_area_ids = parse_focus_area_ids(&req.focus_area_ids);
    if !focus_area_ids.is_empty() {
        let linked = store.link_focus_areas(problem.id, &focus_area_ids).await?;
        tracing::debug!("Linked {} focus areas to problem {}", linked, problem.id);
    }

    let job = store.create_job(problem.id, req.model_id).await?;

    tracing::info!("Problem created: {} with generation job: {}", problem.id, job.id);

    Ok(CreateProblemResponse {
        problem_id: problem.id,
        job_id: job.id,
    })
}

/// Get a problem together with its test cases
pub async fn get_problem(
    store: &dyn GenerationStore,
    id: Uuid,
) -> Result<ProblemWithTestCases, ProblemError> {
    let problem = store
        .get_problem(id)
        .await?
        .ok_or(ProblemError::NotFound(id))?;

    let test_cases = store.test_cases_for_problem(id).await?;

    Ok(ProblemWithTestCases {
        problem,
        test_cases,
    })
}

/// List problem ids, newest first
pub async fn list_problem_ids(store: &dyn GenerationStore) -> Result<Vec<Uuid>, ProblemError> {
    Ok(store.list_problem_ids().await?)
}

/// Focus areas linked to a problem
pub async fn get_focus_areas(
    store: &dyn GenerationStore,
    id: Uuid,
) -> Result<Vec<FocusArea>, ProblemError> {
    ensure_exists(store, id).await?;
    Ok(store.focus_areas_for_problem(id).await?)
}

/// Latest generation job for a problem
pub async fn generation_status(
    store: &dyn GenerationStore,
    id: Uuid,
) -> Result<GenerationJob, ProblemError> {
    ensure_exists(store, id).await?;

    store
        .latest_job_for_problem(id)
        .await?
        .ok_or(ProblemError::NoJob(id))
}

async fn ensure_exists(store: &dyn GenerationStore, id: Uuid) -> Result<(), ProblemError> {
    store
        .get_problem(id)
        .await?
        .map(|_| ())
        .ok_or(ProblemError::NotFound(id))
}

fn parse_focus_area_ids(raw: &[String]) -> Vec<Uuid> {
    raw.iter()
        .filter_map(|id| match Uuid::parse_str(id.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Skipping invalid focus area id: '{}'", id);
                None
            }
        })
        .collect()
}
