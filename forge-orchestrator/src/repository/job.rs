//! Generation Job Repository
//!
//! Handles all database operations related to generation jobs.

use forge_core::domain::job::{GenerationJob, GenerationStep, JobState, JobStatus, UnknownVariant};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new job
pub async fn create(pool: &PgPool, job: &GenerationJob) -> Result<(), sqlx::Error> {
    let completed: Vec<String> = job
        .completed_steps
        .iter()
        .map(|step| step.as_str().to_string())
        .collect();

    sqlx::query(
        r#"
        INSERT INTO generation_jobs (id, problem_id, model_id, status, current_step, completed_steps, error, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(job.id)
    .bind(job.problem_id)
    .bind(job.model_id)
    .bind(job.status.as_str())
    .bind(job.current_step.map(|step| step.as_str()))
    .bind(completed)
    .bind(&job.error)
    .bind(job.created_at)
    .bind(job.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Find a job by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<GenerationJob>, sqlx::Error> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, problem_id, model_id, status, current_step, completed_steps,
               error, created_at, updated_at
        FROM generation_jobs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(GenerationJob::try_from).transpose().map_err(decode_error)
}

/// List all jobs, newest first
pub async fn list_all(pool: &PgPool) -> Result<Vec<GenerationJob>, sqlx::Error> {
    let rows = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, problem_id, model_id, status, current_step, completed_steps,
               error, created_at, updated_at
        FROM generation_jobs
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(GenerationJob::try_from)
        .collect::<Result<_, _>>()
        .map_err(decode_error)
}

/// Find the most recently created job for a problem
pub async fn find_latest_by_problem(
    pool: &PgPool,
    problem_id: Uuid,
) -> Result<Option<GenerationJob>, sqlx::Error> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, problem_id, model_id, status, current_step, completed_steps,
               error, created_at, updated_at
        FROM generation_jobs
        WHERE problem_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(problem_id)
    .fetch_optional(pool)
    .await?;

    row.map(GenerationJob::try_from).transpose().map_err(decode_error)
}

/// Overwrite status, current step and error
pub async fn update_state(pool: &PgPool, id: Uuid, state: &JobState) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE generation_jobs
        SET status = $1, current_step = $2, error = $3, updated_at = $4
        WHERE id = $5
        "#,
    )
    .bind(state.status.as_str())
    .bind(state.current_step.map(|step| step.as_str()))
    .bind(&state.error)
    .bind(chrono::Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Append a step to `completed_steps` unless it is already there
///
/// Returns false when nothing was appended (unknown job or duplicate step).
pub async fn append_step(pool: &PgPool, id: Uuid, step: GenerationStep) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE generation_jobs
        SET completed_steps = array_append(completed_steps, $1::TEXT), updated_at = $2
        WHERE id = $3 AND NOT ($1::TEXT = ANY(completed_steps))
        "#,
    )
    .bind(step.as_str())
    .bind(chrono::Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    problem_id: Uuid,
    model_id: Option<Uuid>,
    status: String,
    current_step: Option<String>,
    completed_steps: Vec<String>,
    error: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<JobRow> for GenerationJob {
    type Error = UnknownVariant;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let completed_steps = row
            .completed_steps
            .iter()
            .map(|step| step.parse::<GenerationStep>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GenerationJob {
            id: row.id,
            problem_id: row.problem_id,
            model_id: row.model_id,
            status: row.status.parse::<JobStatus>()?,
            current_step: row
                .current_step
                .as_deref()
                .map(str::parse::<GenerationStep>)
                .transpose()?,
            completed_steps,
            error: row.error,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn decode_error(err: UnknownVariant) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
