//! In-memory store
//!
//! Backs the server when no database is configured, and the service tests.
//! The lock is only held for the duration of each synchronous map access.

use async_trait::async_trait;
use chrono::Utc;
use forge_core::domain::focus_area::FocusArea;
use forge_core::domain::job::{GenerationJob, GenerationStep, JobState};
use forge_core::domain::model::Model;
use forge_core::domain::problem::{NewProblem, NewTestCase, Problem, ProblemPatch, TestCase};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{DEFAULT_FOCUS_AREAS, GenerationStore, Result, StoreError};

#[derive(Default)]
struct State {
    problems: Vec<Problem>,
    focus_areas: Vec<FocusArea>,
    links: Vec<(Uuid, Uuid)>,
    test_cases: HashMap<Uuid, Vec<TestCase>>,
    models: Vec<Model>,
    jobs: Vec<GenerationJob>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    #[cfg(test)]
    fail_problem_updates: std::sync::atomic::AtomicBool,
    #[cfg(test)]
    fail_failure_records: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the default focus areas
    pub fn with_default_focus_areas() -> Self {
        let store = Self::new();
        let now = Utc::now();
        {
            let mut state = store.lock();
            state.focus_areas = DEFAULT_FOCUS_AREAS
                .iter()
                .enumerate()
                .map(|(order, (name, slug, guidance))| FocusArea {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    slug: slug.to_string(),
                    description: None,
                    prompt_guidance: guidance.to_string(),
                    display_order: order as i32,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                })
                .collect();
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every subsequent problem update fail with a database error
    #[cfg(test)]
    pub fn fail_problem_updates(&self, fail: bool) {
        self.fail_problem_updates
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Make every subsequent write of a `failed` job state error out
    #[cfg(test)]
    pub fn fail_failure_records(&self, fail: bool) {
        self.fail_failure_records
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl GenerationStore for MemoryStore {
    async fn create_problem(&self, new: NewProblem) -> Result<Problem> {
        let problem = Problem::shell(new);
        self.lock().problems.push(problem.clone());
        Ok(problem)
    }

    async fn get_problem(&self, id: Uuid) -> Result<Option<Problem>> {
        let state = self.lock();
        Ok(state.problems.iter().find(|p| p.id == id).cloned())
    }

    async fn list_problem_ids(&self) -> Result<Vec<Uuid>> {
        let state = self.lock();
        Ok(state.problems.iter().rev().map(|p| p.id).collect())
    }

    async fn update_problem(&self, id: Uuid, patch: ProblemPatch) -> Result<()> {
        #[cfg(test)]
        if self
            .fail_problem_updates
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut state = self.lock();
        let problem = state
            .problems
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("problem", id))?;

        if !patch.is_empty() {
            problem.apply(patch);
        }
        Ok(())
    }

    async fn list_focus_areas(&self) -> Result<Vec<FocusArea>> {
        let state = self.lock();
        let mut areas: Vec<FocusArea> = state
            .focus_areas
            .iter()
            .filter(|area| area.is_active)
            .cloned()
            .collect();
        areas.sort_by_key(|area| area.display_order);
        Ok(areas)
    }

    async fn link_focus_areas(&self, problem_id: Uuid, focus_area_ids: &[Uuid]) -> Result<u64> {
        let mut state = self.lock();
        let mut linked = 0;

        for id in focus_area_ids {
            let known = state.focus_areas.iter().any(|area| area.id == *id);
            let already = state.links.contains(&(problem_id, *id));
            if known && !already {
                state.links.push((problem_id, *id));
                linked += 1;
            }
        }

        Ok(linked)
    }

    async fn focus_areas_for_problem(&self, problem_id: Uuid) -> Result<Vec<FocusArea>> {
        let state = self.lock();
        let mut areas: Vec<FocusArea> = state
            .focus_areas
            .iter()
            .filter(|area| state.links.contains(&(problem_id, area.id)))
            .cloned()
            .collect();
        areas.sort_by_key(|area| area.display_order);
        Ok(areas)
    }

    async fn test_cases_for_problem(&self, problem_id: Uuid) -> Result<Vec<TestCase>> {
        let state = self.lock();
        Ok(state.test_cases.get(&problem_id).cloned().unwrap_or_default())
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

        self.lock()
            .test_cases
            .insert(problem_id, cases.clone());
        Ok(cases)
    }

    async fn create_model(&self, name: &str) -> Result<Model> {
        let mut state = self.lock();
        if state.models.iter().any(|m| m.name == name) {
            return Err(StoreError::Conflict(format!("Model '{}' already exists", name)));
        }

        let model = Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.models.push(model.clone());
        Ok(model)
    }

    async fn get_model(&self, id: Uuid) -> Result<Option<Model>> {
        let state = self.lock();
        Ok(state.models.iter().find(|m| m.id == id).cloned())
    }

    async fn list_models(&self) -> Result<Vec<Model>> {
        let state = self.lock();
        let mut models = state.models.clone();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(models)
    }

    async fn create_job(&self, problem_id: Uuid, model_id: Option<Uuid>) -> Result<GenerationJob> {
        let job = GenerationJob::new(problem_id, model_id);
        self.lock().jobs.push(job.clone());
        Ok(job)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<GenerationJob>> {
        let state = self.lock();
        Ok(state.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<GenerationJob>> {
        let state = self.lock();
        Ok(state.jobs.iter().rev().cloned().collect())
    }

    async fn latest_job_for_problem(&self, problem_id: Uuid) -> Result<Option<GenerationJob>> {
        let state = self.lock();
        Ok(state
            .jobs
            .iter()
            .rev()
            .find(|j| j.problem_id == problem_id)
            .cloned())
    }

    async fn update_job_state(&self, id: Uuid, job_state: JobState) -> Result<()> {
        #[cfg(test)]
        if job_state.status == forge_core::domain::job::JobStatus::Failed
            && self
                .fail_failure_records
                .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut state = self.lock();
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| StoreError::not_found("generation job", id))?;

        job.apply_state(job_state);
        Ok(())
    }

    async fn append_completed_step(&self, id: Uuid, step: GenerationStep) -> Result<()> {
        let mut state = self.lock();
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| StoreError::not_found("generation job", id))?;

        if !job.has_completed(step) {
            job.completed_steps.push(step);
            job.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_problem() -> NewProblem {
        NewProblem {
            generated_by_user_id: "default-user".to_string(),
            easier_than: None,
            harder_than: None,
        }
    }

    #[tokio::test]
    async fn test_append_is_duplicate_free() {
        let store = MemoryStore::new();
        let problem = store.create_problem(new_problem()).await.unwrap();
        let job = store.create_job(problem.id, None).await.unwrap();

        store
            .append_completed_step(job.id, GenerationStep::GenerateText)
            .await
            .unwrap();
        store
            .append_completed_step(job.id, GenerationStep::GenerateText)
            .await
            .unwrap();

        let job = store.get_job(job.id).await.unwrap().unwrap();
        assert_eq!(job.completed_steps, vec![GenerationStep::GenerateText]);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();

        let err = store
            .update_problem(missing, ProblemPatch::solution("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "problem", .. }));

        let err = store
            .append_completed_step(missing, GenerationStep::GenerateText)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_link_skips_unknown_and_repeated_focus_areas() {
        let store = MemoryStore::with_default_focus_areas();
        let problem = store.create_problem(new_problem()).await.unwrap();
        let areas = store.list_focus_areas().await.unwrap();
        assert_eq!(areas.len(), DEFAULT_FOCUS_AREAS.len());

        let ids = [areas[0].id, Uuid::new_v4(), areas[0].id, areas[2].id];
        let linked = store.link_focus_areas(problem.id, &ids).await.unwrap();

        assert_eq!(linked, 2);
        let linked_areas = store.focus_areas_for_problem(problem.id).await.unwrap();
        assert_eq!(linked_areas, vec![areas[0].clone(), areas[2].clone()]);
    }

    #[tokio::test]
    async fn test_latest_job_and_listing_order() {
        let store = MemoryStore::new();
        let problem = store.create_problem(new_problem()).await.unwrap();
        let first = store.create_job(problem.id, None).await.unwrap();
        let second = store.create_job(problem.id, None).await.unwrap();

        let latest = store.latest_job_for_problem(problem.id).await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);

        let ids: Vec<Uuid> = store.list_jobs().await.unwrap().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_duplicate_model_name_conflicts() {
        let store = MemoryStore::new();
        store.create_model("openai/gpt-4o").await.unwrap();

        let err = store.create_model("openai/gpt-4o").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
