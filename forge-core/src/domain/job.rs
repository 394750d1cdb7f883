//! Generation job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Durable record tracking a problem's generation progress
///
/// `completed_steps` is append-only and duplicate-free; its order is the
/// order in which the steps finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationJob {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub model_id: Option<Uuid>,
    pub status: JobStatus,
    pub current_step: Option<GenerationStep>,
    pub completed_steps: Vec<GenerationStep>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GenerationJob {
    /// Create a fresh `pending` job for a problem
    pub fn new(problem_id: Uuid, model_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            problem_id,
            model_id,
            status: JobStatus::Pending,
            current_step: None,
            completed_steps: Vec::new(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_completed(&self, step: GenerationStep) -> bool {
        self.completed_steps.contains(&step)
    }

    /// First step of `plan` that has not been completed yet
    pub fn next_step(&self, plan: &[GenerationStep]) -> Option<GenerationStep> {
        plan.iter().copied().find(|step| !self.has_completed(*step))
    }

    pub fn apply_state(&mut self, state: JobState) {
        self.status = state.status;
        self.current_step = state.current_step;
        self.error = state.error;
        self.updated_at = Utc::now();
    }

    pub fn state(&self) -> JobState {
        JobState {
            status: self.status,
            current_step: self.current_step,
            error: self.error.clone(),
        }
    }
}

/// Status, current step and error, always written together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobState {
    pub status: JobStatus,
    pub current_step: Option<GenerationStep>,
    pub error: Option<String>,
}

impl JobState {
    /// A step has started; a previous failure message stays visible until
    /// the step succeeds
    pub fn running(step: GenerationStep, previous_error: Option<String>) -> Self {
        Self {
            status: JobStatus::InProgress,
            current_step: Some(step),
            error: previous_error,
        }
    }

    /// A step finished and more remain
    pub fn between_steps() -> Self {
        Self {
            status: JobStatus::InProgress,
            current_step: None,
            error: None,
        }
    }

    pub fn completed() -> Self {
        Self {
            status: JobStatus::Completed,
            current_step: None,
            error: None,
        }
    }

    pub fn failed(step: GenerationStep, error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            current_step: Some(step),
            error: Some(error.into()),
        }
    }
}

/// Generation job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "in_progress" => Ok(JobStatus::InProgress),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(UnknownVariant::new("job status", other)),
        }
    }
}

/// One unit of the generation sequence
///
/// Each step produces exactly one problem field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStep {
    GenerateText,
    GenerateSolution,
    GenerateTestCases,
}

impl GenerationStep {
    pub const ALL: [GenerationStep; 3] = [
        GenerationStep::GenerateText,
        GenerationStep::GenerateSolution,
        GenerationStep::GenerateTestCases,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStep::GenerateText => "generate_text",
            GenerationStep::GenerateSolution => "generate_solution",
            GenerationStep::GenerateTestCases => "generate_test_cases",
        }
    }
}

impl fmt::Display for GenerationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationStep {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GenerationStep::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("generation step", s))
    }
}

/// A persisted string did not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
