//! Store Module
//!
//! The persistence gateway consumed by the services. Every operation is
//! atomic at the single-record level; nothing here spans records in a
//! transaction except `replace_test_cases`, which only touches one problem.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use forge_core::domain::focus_area::FocusArea;
use forge_core::domain::job::{GenerationJob, GenerationStep, JobState};
use forge_core::domain::model::Model;
use forge_core::domain::problem::{NewProblem, NewTestCase, Problem, ProblemPatch, TestCase};
use thiserror::Error;
use uuid::Uuid;

/// Focus areas available on a fresh database: (name, slug, prompt guidance)
pub const DEFAULT_FOCUS_AREAS: &[(&str, &str, &str)] = &[
    ("Arrays & Hashing", "arrays-hashing", "array manipulation and hash map lookups"),
    ("Two Pointers", "two-pointers", "the two pointers technique on sorted sequences"),
    ("Sliding Window", "sliding-window", "sliding windows over arrays or strings"),
    ("Binary Search", "binary-search", "binary search over sorted data or answer spaces"),
    ("Trees", "trees", "binary tree traversal and recursion"),
    ("Graphs", "graphs", "graph traversal with BFS or DFS"),
    ("Heaps", "heaps", "priority queues and top-k selection"),
    ("Dynamic Programming", "dynamic-programming", "dynamic programming with overlapping subproblems"),
];

/// Persistence error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        StoreError::NotFound { entity, id }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Record store for problems, test cases, focus areas, models and jobs
#[async_trait]
pub trait GenerationStore: Send + Sync {
    // Problems
    async fn create_problem(&self, new: NewProblem) -> Result<Problem>;
    async fn get_problem(&self, id: Uuid) -> Result<Option<Problem>>;
    async fn list_problem_ids(&self) -> Result<Vec<Uuid>>;
    async fn update_problem(&self, id: Uuid, patch: ProblemPatch) -> Result<()>;

    // Focus areas
    async fn list_focus_areas(&self) -> Result<Vec<FocusArea>>;
    async fn link_focus_areas(&self, problem_id: Uuid, focus_area_ids: &[Uuid]) -> Result<u64>;
    async fn focus_areas_for_problem(&self, problem_id: Uuid) -> Result<Vec<FocusArea>>;

    // Test cases
    async fn test_cases_for_problem(&self, problem_id: Uuid) -> Result<Vec<TestCase>>;
    async fn replace_test_cases(
        &self,
        problem_id: Uuid,
        cases: Vec<NewTestCase>,
    ) -> Result<Vec<TestCase>>;

    // Models
    async fn create_model(&self, name: &str) -> Result<Model>;
    async fn get_model(&self, id: Uuid) -> Result<Option<Model>>;
    async fn list_models(&self) -> Result<Vec<Model>>;

    // Jobs
    async fn create_job(&self, problem_id: Uuid, model_id: Option<Uuid>) -> Result<GenerationJob>;
    async fn get_job(&self, id: Uuid) -> Result<Option<GenerationJob>>;
    async fn list_jobs(&self) -> Result<Vec<GenerationJob>>;
    async fn latest_job_for_problem(&self, problem_id: Uuid) -> Result<Option<GenerationJob>>;
    async fn update_job_state(&self, id: Uuid, state: JobState) -> Result<()>;

    /// Append `step` to the job's completed steps; a step already present
    /// is left alone
    async fn append_completed_step(&self, id: Uuid, step: GenerationStep) -> Result<()>;
}
