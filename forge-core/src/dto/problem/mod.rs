//! Problem DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::problem::{Problem, TestCase};

/// Request to create a problem together with its generation job
///
/// Focus area ids arrive as raw strings; ids that do not parse are skipped
/// by the orchestrator rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProblem {
    #[serde(default)]
    pub focus_area_ids: Vec<String>,
    #[serde(default)]
    pub model_id: Option<Uuid>,
}

/// Identifiers returned after creating a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProblemResponse {
    pub problem_id: Uuid,
    pub job_id: Uuid,
}

/// A problem with all of its test cases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemWithTestCases {
    #[serde(flatten)]
    pub problem: Problem,
    pub test_cases: Vec<TestCase>,
}
