//! Generation Service
//!
//! Drives a generation job through its step plan. Each advance claims the
//! job's lease, selects the first step not yet completed, calls the provider
//! and writes the output back to the problem. A step is appended to
//! `completed_steps` only after its output was durably written.

use forge_core::domain::job::{GenerationJob, GenerationStep, JobState, JobStatus};
use forge_core::domain::problem::{Problem, ProblemPatch};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use super::lease::{JobLease, LeaseRegistry};
use super::prompt;
use crate::provider::{CompletionProvider, ProviderError};
use crate::store::{GenerationStore, StoreError};

/// Orchestrator error type
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// Another advance currently holds the job; safe to retry later
    #[error("generation job {0} is already being advanced")]
    LeaseConflict(Uuid),

    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("persistence failure: {0}")]
    Persistence(StoreError),

    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// A step failed and the failure was recorded on the job
    #[error("step {step} failed: {source}")]
    StepFailed {
        job: Box<GenerationJob>,
        step: GenerationStep,
        source: Box<GenerationError>,
    },
}

impl From<StoreError> for GenerationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => GenerationError::NotFound { entity, id },
            other => GenerationError::Persistence(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

/// The generation orchestrator
pub struct Generator {
    store: Arc<dyn GenerationStore>,
    provider: Arc<dyn CompletionProvider>,
    plan: Vec<GenerationStep>,
    provider_timeout: Duration,
    leases: LeaseRegistry,
}

impl Generator {
    pub fn new(
        store: Arc<dyn GenerationStore>,
        provider: Arc<dyn CompletionProvider>,
        plan: Vec<GenerationStep>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            store,
            provider,
            plan,
            provider_timeout,
            leases: LeaseRegistry::new(),
        }
    }

    pub fn plan(&self) -> &[GenerationStep] {
        &self.plan
    }

    /// Get a job by ID
    pub async fn get_job(&self, job_id: Uuid) -> Result<GenerationJob> {
        self.load_job(job_id).await
    }

    /// Advance a job by one step
    ///
    /// A completed job is returned unchanged without calling the provider.
    /// A failed job re-attempts the step it failed on.
    pub async fn advance(&self, job_id: Uuid) -> Result<GenerationJob> {
        let _lease = self.lease(job_id)?;

        self.advance_leased(job_id)
            .instrument(tracing::info_span!("advance", %job_id))
            .await
    }

    /// Advance a job until it completes or a step fails
    pub async fn run_to_completion(&self, job_id: Uuid) -> Result<GenerationJob> {
        let _lease = self.lease(job_id)?;

        self.run_leased(job_id)
            .instrument(tracing::info_span!("run_to_completion", %job_id))
            .await
    }

    async fn run_leased(&self, job_id: Uuid) -> Result<GenerationJob> {
        loop {
            let job = self.advance_leased(job_id).await?;
            if job.status == JobStatus::Completed {
                return Ok(job);
            }
        }
    }

    fn lease(&self, job_id: Uuid) -> Result<JobLease> {
        self.leases.try_acquire(job_id).ok_or_else(|| {
            tracing::warn!("Generation job {} is already being advanced", job_id);
            GenerationError::LeaseConflict(job_id)
        })
    }

    async fn advance_leased(&self, job_id: Uuid) -> Result<GenerationJob> {
        let job = self.load_job(job_id).await?;

        // Completed is terminal, even when the plan has grown since
        if job.status == JobStatus::Completed {
            tracing::debug!("Generation job {} already completed", job_id);
            return Ok(job);
        }

        let Some(step) = job.next_step(&self.plan) else {
            self.store.update_job_state(job_id, JobState::completed()).await?;
            tracing::info!("Generation job {} completed", job_id);
            return self.load_job(job_id).await;
        };

        self.store
            .update_job_state(job_id, JobState::running(step, job.error.clone()))
            .await?;
        tracing::info!("Generation job {} started step {}", job_id, step);

        let outcome = match self.execute(&job, step).await {
            Ok(()) => self
                .store
                .append_completed_step(job_id, step)
                .await
                .map_err(GenerationError::from),
            Err(err) => Err(err),
        };

        if let Err(err) = outcome {
            tracing::error!("Generation job {} failed at step {}: {}", job_id, step, err);
            if let Err(record_err) = self
                .store
                .update_job_state(job_id, JobState::failed(step, err.to_string()))
                .await
            {
                tracing::error!(
                    "Could not record failure of generation job {} at step {}: {}",
                    job_id,
                    step,
                    record_err
                );
                return Err(err);
            }

            return Err(GenerationError::StepFailed {
                job: Box::new(self.load_job(job_id).await?),
                step,
                source: Box::new(err),
            });
        }

        let remaining = self
            .plan
            .iter()
            .any(|s| *s != step && !job.has_completed(*s));

        if remaining {
            self.store
                .update_job_state(job_id, JobState::between_steps())
                .await?;
            tracing::info!("Generation job {} finished step {}", job_id, step);
        } else {
            self.store.update_job_state(job_id, JobState::completed()).await?;
            tracing::info!("Generation job {} completed after step {}", job_id, step);
        }

        self.load_job(job_id).await
    }

    /// Run one step and persist its output
    async fn execute(&self, job: &GenerationJob, step: GenerationStep) -> Result<()> {
        let problem = self.load_problem(job.problem_id).await?;
        let model = self.resolve_model(job.model_id).await?;

        match step {
            GenerationStep::GenerateText => {
                let focus_areas = self.store.focus_areas_for_problem(problem.id).await?;
                let text = self
                    .complete(&prompt::problem_text(&focus_areas), &model)
                    .await?;

                self.store
                    .update_problem(
                        problem.id,
                        ProblemPatch::problem_text(text).with_model(job.model_id),
                    )
                    .await?;
            }
            GenerationStep::GenerateSolution => {
                let solution = self
                    .complete(&prompt::solution(&problem.problem_text), &model)
                    .await?;

                self.store
                    .update_problem(problem.id, ProblemPatch::solution(solution))
                    .await?;
            }
            GenerationStep::GenerateTestCases => {
                let completion = self
                    .complete(
                        &prompt::test_cases(&problem.problem_text, problem.solution.as_deref()),
                        &model,
                    )
                    .await?;

                let cases =
                    prompt::parse_test_cases(&completion).map_err(GenerationError::MalformedOutput)?;
                let stored = self.store.replace_test_cases(problem.id, cases).await?;
                tracing::debug!("Stored {} test cases for problem {}", stored.len(), problem.id);
            }
        }

        Ok(())
    }

    /// One provider call bounded by the configured timeout
    async fn complete(&self, prompt: &str, model: &str) -> Result<String> {
        tracing::debug!(
            "Calling {} (model: {})",
            self.provider.name(),
            if model.is_empty() { "default" } else { model }
        );

        match tokio::time::timeout(self.provider_timeout, self.provider.complete(prompt, model)).await
        {
            Ok(result) => Ok(result?),
            Err(_) => Err(ProviderError::Transport(format!(
                "provider call timed out after {:?}",
                self.provider_timeout
            ))
            .into()),
        }
    }

    /// Provider model identifier for a job; empty selects the provider default
    async fn resolve_model(&self, model_id: Option<Uuid>) -> Result<String> {
        let Some(model_id) = model_id else {
            return Ok(String::new());
        };

        let model = self
            .store
            .get_model(model_id)
            .await?
            .ok_or(GenerationError::NotFound {
                entity: "model",
                id: model_id,
            })?;

        Ok(model.name)
    }

    async fn load_job(&self, job_id: Uuid) -> Result<GenerationJob> {
        self.store
            .get_job(job_id)
            .await?
            .ok_or(GenerationError::NotFound {
                entity: "generation job",
                id: job_id,
            })
    }

    async fn load_problem(&self, problem_id: Uuid) -> Result<Problem> {
        self.store
            .get_problem(problem_id)
            .await?
            .ok_or(GenerationError::NotFound {
                entity: "problem",
                id: problem_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use forge_core::domain::problem::NewProblem;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TWO_STEPS: [GenerationStep; 2] =
        [GenerationStep::GenerateText, GenerationStep::GenerateSolution];

    /// Replays scripted responses and records every call; an unscripted
    /// call fails the test
    #[derive(Default)]
    struct ScriptedProvider {
        responses: Mutex<VecDeque<std::result::Result<String, ProviderError>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<std::result::Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn ok(texts: &[&str]) -> Arc<Self> {
            Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
        }

        fn prompts(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
        }

        fn models(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(
            &self,
            prompt: &str,
            model: &str,
        ) -> std::result::Result<String, ProviderError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), model.to_string()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected provider call: {}", prompt))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    /// Sleeps before answering and counts calls
    struct SlowProvider {
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionProvider for SlowProvider {
        async fn complete(
            &self,
            _prompt: &str,
            _model: &str,
        ) -> std::result::Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok("slow text".to_string())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn step_failed(err: GenerationError) -> (GenerationJob, GenerationStep, GenerationError) {
        match err {
            GenerationError::StepFailed { job, step, source } => (*job, step, *source),
            other => panic!("expected StepFailed, got {:?}", other),
        }
    }

    async fn setup(model_id: Option<Uuid>) -> (Arc<MemoryStore>, GenerationJob) {
        let store = Arc::new(MemoryStore::with_default_focus_areas());
        let job = create_job(&store, model_id).await;
        (store, job)
    }

    async fn create_job(store: &MemoryStore, model_id: Option<Uuid>) -> GenerationJob {
        let problem = store
            .create_problem(NewProblem {
                generated_by_user_id: "default-user".to_string(),
                easier_than: None,
                harder_than: None,
            })
            .await
            .unwrap();
        store.create_job(problem.id, model_id).await.unwrap()
    }

    fn generator(
        store: &Arc<MemoryStore>,
        provider: Arc<dyn CompletionProvider>,
        plan: &[GenerationStep],
    ) -> Generator {
        Generator::new(
            store.clone(),
            provider,
            plan.to_vec(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_first_advance_generates_text() {
        let (store, job) = setup(None).await;
        assert_eq!(job.status, JobStatus::Pending);
        let provider = ScriptedProvider::ok(&["Two Sum: find two indices..."]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        let job = generator.advance(job.id).await.unwrap();

        assert_eq!(provider.prompts(), vec![prompt::problem_text(&[])]);
        assert!(!provider.prompts()[0].contains("focusing on"));
        assert_eq!(provider.models(), vec![String::new()]);
        assert_eq!(job.completed_steps, vec![GenerationStep::GenerateText]);
        assert_eq!(job.status, JobStatus::InProgress);
        assert!(job.current_step.is_none());

        let problem = store.get_problem(job.problem_id).await.unwrap().unwrap();
        assert_eq!(problem.problem_text, "Two Sum: find two indices...");
    }

    #[tokio::test]
    async fn test_final_step_completes_job() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::ok(&["Reverse a string.", "def solve(s): return s[::-1]"]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        generator.advance(job.id).await.unwrap();
        let job = generator.advance(job.id).await.unwrap();

        assert!(provider.prompts()[1].contains("Reverse a string."));
        assert_eq!(job.completed_steps, TWO_STEPS.to_vec());
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.current_step.is_none());
        assert!(job.error.is_none());

        let problem = store.get_problem(job.problem_id).await.unwrap().unwrap();
        assert_eq!(problem.solution.as_deref(), Some("def solve(s): return s[::-1]"));
    }

    #[tokio::test]
    async fn test_provider_error_fails_job_and_keeps_completed_steps() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::new(vec![
            Ok("Merge intervals.".to_string()),
            Err(ProviderError::Status {
                status: 500,
                body: "internal boom".to_string(),
            }),
        ]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        generator.advance(job.id).await.unwrap();
        let err = generator.advance(job.id).await.unwrap_err();

        let (failed, step, source) = step_failed(err);
        assert_eq!(step, GenerationStep::GenerateSolution);
        assert!(matches!(source, GenerationError::Provider(ProviderError::Status { status: 500, .. })));

        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.current_step, Some(GenerationStep::GenerateSolution));
        assert_eq!(failed.completed_steps, vec![GenerationStep::GenerateText]);
        let error = failed.error.unwrap();
        assert!(error.contains("500"));
        assert!(error.contains("internal boom"));

        let problem = store.get_problem(job.problem_id).await.unwrap().unwrap();
        assert!(problem.solution.is_none());
    }

    #[tokio::test]
    async fn test_failed_job_retries_only_the_failed_step() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::new(vec![
            Ok("Merge intervals.".to_string()),
            Err(ProviderError::EmptyResponse),
            Ok("def merge(xs): ...".to_string()),
        ]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        generator.advance(job.id).await.unwrap();
        generator.advance(job.id).await.unwrap_err();
        let job = generator.advance(job.id).await.unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 3);
        assert_eq!(prompts[1], prompts[2]);
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.completed_steps, TWO_STEPS.to_vec());
        assert!(job.error.is_none());
    }

    #[tokio::test]
    async fn test_advancing_completed_job_is_noop() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::ok(&["text", "solution"]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        let completed = generator.run_to_completion(job.id).await.unwrap();
        let problem_before = store.get_problem(job.problem_id).await.unwrap();

        let again = generator.advance(job.id).await.unwrap();

        assert_eq!(again, completed);
        assert_eq!(provider.prompts().len(), 2);
        assert_eq!(store.get_problem(job.problem_id).await.unwrap(), problem_before);
    }

    #[tokio::test]
    async fn test_completed_job_stays_completed_when_plan_grows() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::ok(&["text", "solution"]);

        let two_steps = generator(&store, provider.clone(), &TWO_STEPS);
        let completed = two_steps.run_to_completion(job.id).await.unwrap();
        let problem_before = store.get_problem(job.problem_id).await.unwrap();

        let all_steps = generator(&store, provider.clone(), &GenerationStep::ALL);
        let again = all_steps.advance(job.id).await.unwrap();
        let ran = all_steps.run_to_completion(job.id).await.unwrap();

        assert_eq!(again, completed);
        assert_eq!(ran, completed);
        assert_eq!(provider.prompts().len(), 2);
        assert_eq!(again.completed_steps, TWO_STEPS.to_vec());
        assert_eq!(store.get_problem(job.problem_id).await.unwrap(), problem_before);
        assert!(store.test_cases_for_problem(job.problem_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unrecorded_failure_returns_step_error() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::new(vec![Err(ProviderError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        store.fail_failure_records(true);
        let err = generator.advance(job.id).await.unwrap_err();

        assert!(matches!(
            err,
            GenerationError::Provider(ProviderError::Status { status: 503, .. })
        ));
        let job = store.get_job(job.id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::InProgress);
        assert!(job.completed_steps.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_advances_call_provider_once() {
        let (store, job) = setup(None).await;
        let provider = Arc::new(SlowProvider {
            delay: Duration::from_millis(100),
            calls: AtomicUsize::new(0),
        });
        let generator = Arc::new(generator(&store, provider.clone(), &TWO_STEPS));

        let (first, second) = tokio::join!(generator.advance(job.id), generator.advance(job.id));

        let results = [first, second];
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(GenerationError::LeaseConflict(id)) if *id == job.id))
            .count();
        assert_eq!(conflicts, 1);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let job = store.get_job(job.id).await.unwrap().unwrap();
        assert_eq!(job.completed_steps, vec![GenerationStep::GenerateText]);
    }

    #[tokio::test]
    async fn test_concurrent_advances_on_different_jobs_both_run() {
        let (store, first) = setup(None).await;
        let second = create_job(&store, None).await;
        let provider = Arc::new(SlowProvider {
            delay: Duration::from_millis(20),
            calls: AtomicUsize::new(0),
        });
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        let (a, b) = tokio::join!(generator.advance(first.id), generator.advance(second.id));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_timeout_is_transport_failure() {
        let (store, job) = setup(None).await;
        let provider = Arc::new(SlowProvider {
            delay: Duration::from_secs(5),
            calls: AtomicUsize::new(0),
        });
        let generator = Generator::new(
            store.clone(),
            provider,
            TWO_STEPS.to_vec(),
            Duration::from_millis(20),
        );

        let err = generator.advance(job.id).await.unwrap_err();

        let (failed, _, source) = step_failed(err);
        assert!(matches!(source, GenerationError::Provider(ProviderError::Transport(_))));
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(failed.error.unwrap().contains("timed out"));
        assert!(failed.completed_steps.is_empty());
    }

    #[tokio::test]
    async fn test_focus_areas_shape_text_prompt() {
        let (store, job) = setup(None).await;
        let areas = store.list_focus_areas().await.unwrap();
        store
            .link_focus_areas(job.problem_id, &[areas[1].id, areas[5].id])
            .await
            .unwrap();
        let provider = ScriptedProvider::ok(&["text"]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        generator.advance(job.id).await.unwrap();

        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("focusing on: "));
        assert!(prompt.contains(&areas[1].prompt_guidance));
        assert!(prompt.contains(&areas[5].prompt_guidance));
    }

    #[tokio::test]
    async fn test_job_model_is_used_and_recorded() {
        let store = Arc::new(MemoryStore::new());
        let model = store.create_model("openai/gpt-4o-mini").await.unwrap();
        let job = create_job(&store, Some(model.id)).await;
        let provider = ScriptedProvider::ok(&["text"]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        generator.advance(job.id).await.unwrap();

        assert_eq!(provider.models(), vec!["openai/gpt-4o-mini".to_string()]);
        let problem = store.get_problem(job.problem_id).await.unwrap().unwrap();
        assert_eq!(problem.generated_by_model_id, Some(model.id));
    }

    #[tokio::test]
    async fn test_dangling_model_fails_step() {
        let (store, job) = setup(Some(Uuid::new_v4())).await;
        let provider = ScriptedProvider::ok(&[]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        let err = generator.advance(job.id).await.unwrap_err();

        let (failed, _, source) = step_failed(err);
        assert!(matches!(source, GenerationError::NotFound { entity: "model", .. }));
        assert_eq!(failed.status, JobStatus::Failed);
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_leaves_step_unmarked() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::ok(&["text", "text again"]);
        let generator = generator(&store, provider.clone(), &TWO_STEPS);

        store.fail_problem_updates(true);
        let err = generator.advance(job.id).await.unwrap_err();

        let (failed, _, source) = step_failed(err);
        assert!(matches!(source, GenerationError::Persistence(_)));
        assert!(failed.completed_steps.is_empty());
        assert_eq!(failed.status, JobStatus::Failed);

        store.fail_problem_updates(false);
        let job = generator.advance(job.id).await.unwrap();
        assert_eq!(job.completed_steps, vec![GenerationStep::GenerateText]);
        let problem = store.get_problem(job.problem_id).await.unwrap().unwrap();
        assert_eq!(problem.problem_text, "text again");
    }

    #[tokio::test]
    async fn test_three_step_plan_stores_test_cases() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::ok(&[
            "Add two numbers.",
            "def add(a, b): return a + b",
            "```json\n[{\"description\": \"zeros\", \"input\": [0, 0], \"expected\": 0},\
             {\"description\": \"negatives\", \"is_edge_case\": true, \"input\": [-1, -2], \"expected\": -3}]\n```",
        ]);
        let generator = generator(&store, provider.clone(), &GenerationStep::ALL);

        let job = generator.run_to_completion(job.id).await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.completed_steps, GenerationStep::ALL.to_vec());
        assert!(provider.prompts()[2].contains("def add(a, b)"));

        let cases = store.test_cases_for_problem(job.problem_id).await.unwrap();
        assert_eq!(cases.len(), 2);
        assert!(cases[1].is_edge_case);
        assert_eq!(cases[1].expected, serde_json::json!(-3));
    }

    #[tokio::test]
    async fn test_unparsable_test_cases_fail_step() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::ok(&["text", "solution", "Sorry, I cannot do that."]);
        let generator = generator(&store, provider.clone(), &GenerationStep::ALL);

        let err = generator.run_to_completion(job.id).await.unwrap_err();

        let (failed, step, source) = step_failed(err);
        assert_eq!(step, GenerationStep::GenerateTestCases);
        assert!(matches!(source, GenerationError::MalformedOutput(_)));
        assert_eq!(failed.completed_steps, TWO_STEPS.to_vec());
        assert!(store.test_cases_for_problem(job.problem_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let generator = generator(&store, ScriptedProvider::ok(&[]), &TWO_STEPS);

        let err = generator.advance(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, GenerationError::NotFound { entity: "generation job", .. }));

        let err = generator.get_job(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, GenerationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_lease_is_released_after_failure() {
        let (store, job) = setup(None).await;
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::Transport("connection refused".to_string())),
            Ok("text".to_string()),
        ]);
        let generator = generator(&store, provider, &TWO_STEPS);

        assert!(generator.advance(job.id).await.is_err());
        assert!(generator.advance(job.id).await.is_ok());
    }
}
