//! Postgres-backed store, delegating to the repositories

use async_trait::async_trait;
use forge_core::domain::focus_area::FocusArea;
use forge_core::domain::job::{GenerationJob, GenerationStep, JobState};
use forge_core::domain::model::Model;
use forge_core::domain::problem::{NewProblem, NewTestCase, Problem, ProblemPatch, TestCase};
use sqlx::PgPool;
use uuid::Uuid;

use super::{GenerationStore, Result, StoreError};
use crate::repository::{
    focus_area_repository, job_repository, model_repository, problem_repository,
    test_case_repository,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenerationStore for PgStore {
    async fn create_problem(&self, new: NewProblem) -> Result<Problem> {
        let problem = Problem::shell(new);
        problem_repository::create(&self.pool, &problem).await?;
        Ok(problem)
    }

    async fn get_problem(&self, id: Uuid) -> Result<Option<Problem>> {
        Ok(problem_repository::find_by_id(&self.pool, id).await?)
    }

    async fn list_problem_ids(&self) -> Result<Vec<Uuid>> {
        Ok(problem_repository::list_ids(&self.pool).await?)
    }

    async fn update_problem(&self, id: Uuid, patch: ProblemPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        if !problem_repository::update(&self.pool, id, &patch).await? {
            return Err(StoreError::not_found("problem", id));
        }
        Ok(())
    }

    async fn list_focus_areas(&self) -> Result<Vec<FocusArea>> {
        Ok(focus_area_repository::list_active(&self.pool).await?)
    }

    async fn link_focus_areas(&self, problem_id: Uuid, focus_area_ids: &[Uuid]) -> Result<u64> {
        Ok(focus_area_repository::link_to_problem(&self.pool, problem_id, focus_area_ids).await?)
    }

    async fn focus_areas_for_problem(&self, problem_id: Uuid) -> Result<Vec<FocusArea>> {
        Ok(focus_area_repository::find_for_problem(&self.pool, problem_id).await?)
    }

    async fn test_cases_for_problem(&self, problem_id: Uuid) -> Result<Vec<TestCase>> {
        Ok(test_case_repository::find_by_problem(&self.pool, problem_id).await?)
    }

    async fn replace_test_cases(
        &self,
        problem_id: Uuid,
        cases: Vec<NewTestCase>,
    ) -> Result<Vec<TestCase>> {
        let cases: Vec<TestCase> = cases
            .into_iter()
            .map(|case| case.into_test_case(problem_id))
            .collect();

        test_case_repository::replace_for_problem(&self.pool, problem_id, &cases).await?;
        Ok(cases)
    }

    async fn create_model(&self, name: &str) -> Result<Model> {
        if model_repository::find_by_name(&self.pool, name).await?.is_some() {
            return Err(duplicate_model(name));
        }

        // A concurrent insert of the same name surfaces as a unique violation
        model_repository::create(&self.pool, name)
            .await
            .map_err(|err| unique_violation_as(err, || duplicate_model(name)))
    }

    async fn get_model(&self, id: Uuid) -> Result<Option<Model>> {
        Ok(model_repository::find_by_id(&self.pool, id).await?)
    }

    async fn list_models(&self) -> Result<Vec<Model>> {
        Ok(model_repository::list_all(&self.pool).await?)
    }

    async fn create_job(&self, problem_id: Uuid, model_id: Option<Uuid>) -> Result<GenerationJob> {
        let job = GenerationJob::new(problem_id, model_id);
        job_repository::create(&self.pool, &job).await?;
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<GenerationJob>> {
        Ok(job_repository::find_by_id(&self.pool, id).await?)
    }

    async fn list_jobs(&self) -> Result<Vec<GenerationJob>> {
        Ok(job_repository::list_all(&self.pool).await?)
    }

    async fn latest_job_for_problem(&self, problem_id: Uuid) -> Result<Option<GenerationJob>> {
        Ok(job_repository::find_latest_by_problem(&self.pool, problem_id).await?)
    }

    async fn update_job_state(&self, id: Uuid, state: JobState) -> Result<()> {
        if !job_repository::update_state(&self.pool, id, &state).await? {
            return Err(StoreError::not_found("generation job", id));
        }
        Ok(())
    }

    async fn append_completed_step(&self, id: Uuid, step: GenerationStep) -> Result<()> {
        if job_repository::append_step(&self.pool, id, step).await? {
            return Ok(());
        }

        // Nothing appended: either the step was already recorded or the job is gone
        match job_repository::find_by_id(&self.pool, id).await? {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found("generation job", id)),
        }
    }
}

fn duplicate_model(name: &str) -> StoreError {
    StoreError::Conflict(format!("Model '{}' already exists", name))
}

/// Map a unique-constraint violation to `conflict`, any other error to `Database`
fn unique_violation_as(err: sqlx::Error, conflict: impl FnOnce() -> StoreError) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return conflict();
        }
    }
    StoreError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::fmt;

    #[derive(Debug)]
    struct FakeDbError {
        unique: bool,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    #[test]
    fn test_unique_violation_on_model_insert_is_conflict() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: true }));

        let mapped = unique_violation_as(err, || duplicate_model("gpt-4o"));

        assert!(matches!(&mapped, StoreError::Conflict(msg) if msg.contains("gpt-4o")));
    }

    #[test]
    fn test_other_database_errors_stay_database() {
        let err = sqlx::Error::Database(Box::new(FakeDbError { unique: false }));
        assert!(matches!(
            unique_violation_as(err, || duplicate_model("m")),
            StoreError::Database(_)
        ));

        assert!(matches!(
            unique_violation_as(sqlx::Error::PoolTimedOut, || duplicate_model("m")),
            StoreError::Database(sqlx::Error::PoolTimedOut)
        ));
    }
}
