//! Problem domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A coding interview problem
///
/// Created as an empty shell and filled in field by field as generation
/// steps complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub problem_text: String,
    pub function_signature: String,
    pub function_signature_schema: Option<serde_json::Value>,
    pub problem_text_reworded: String,
    pub solution: Option<String>,
    pub generated_by_model_id: Option<Uuid>,
    pub generated_by_user_id: String,
    pub easier_than: Option<Uuid>,
    pub harder_than: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    /// Create an empty shell problem
    pub fn shell(new: NewProblem) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            problem_text: String::new(),
            function_signature: String::new(),
            function_signature_schema: None,
            problem_text_reworded: String::new(),
            solution: None,
            generated_by_model_id: None,
            generated_by_user_id: new.generated_by_user_id,
            easier_than: new.easier_than,
            harder_than: new.harder_than,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a field patch in place
    pub fn apply(&mut self, patch: ProblemPatch) {
        if let Some(text) = patch.problem_text {
            self.problem_text = text;
        }
        if let Some(signature) = patch.function_signature {
            self.function_signature = signature;
        }
        if let Some(schema) = patch.function_signature_schema {
            self.function_signature_schema = Some(schema);
        }
        if let Some(reworded) = patch.problem_text_reworded {
            self.problem_text_reworded = reworded;
        }
        if let Some(solution) = patch.solution {
            self.solution = Some(solution);
        }
        if let Some(model_id) = patch.generated_by_model_id {
            self.generated_by_model_id = Some(model_id);
        }
        self.updated_at = Utc::now();
    }
}

/// Fields needed to create a shell problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProblem {
    pub generated_by_user_id: String,
    pub easier_than: Option<Uuid>,
    pub harder_than: Option<Uuid>,
}

/// Partial update of a problem
///
/// Every updatable field is listed explicitly; `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemPatch {
    pub problem_text: Option<String>,
    pub function_signature: Option<String>,
    pub function_signature_schema: Option<serde_json::Value>,
    pub problem_text_reworded: Option<String>,
    pub solution: Option<String>,
    pub generated_by_model_id: Option<Uuid>,
}

impl ProblemPatch {
    pub fn is_empty(&self) -> bool {
        *self == ProblemPatch::default()
    }

    pub fn problem_text(text: impl Into<String>) -> Self {
        Self {
            problem_text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn solution(solution: impl Into<String>) -> Self {
        Self {
            solution: Some(solution.into()),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model_id: Option<Uuid>) -> Self {
        self.generated_by_model_id = model_id;
        self
    }
}

/// A test case belonging to exactly one problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub description: String,
    pub is_edge_case: bool,
    pub is_sample_case: bool,
    pub input_code: Option<String>,
    pub input: serde_json::Value,
    pub expected: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Test case contents before persistence
///
/// Missing flags and values default so that loosely shaped model output
/// still deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTestCase {
    pub description: String,
    #[serde(default)]
    pub is_edge_case: bool,
    #[serde(default)]
    pub is_sample_case: bool,
    #[serde(default)]
    pub input_code: Option<String>,
    #[serde(default)]
    pub input: serde_json::Value,
    #[serde(default)]
    pub expected: serde_json::Value,
}

impl NewTestCase {
    pub fn into_test_case(self, problem_id: Uuid) -> TestCase {
        let now = Utc::now();
        TestCase {
            id: Uuid::new_v4(),
            problem_id,
            description: self.description,
            is_edge_case: self.is_edge_case,
            is_sample_case: self.is_sample_case,
            input_code: self.input_code,
            input: self.input,
            expected: self.expected,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell() -> Problem {
        Problem::shell(NewProblem {
            generated_by_user_id: "default-user".to_string(),
            easier_than: None,
            harder_than: None,
        })
    }

    #[test]
    fn test_shell_problem_has_empty_generated_fields() {
        let problem = shell();
        assert!(problem.problem_text.is_empty());
        assert!(problem.function_signature.is_empty());
        assert!(problem.solution.is_none());
        assert_eq!(problem.generated_by_user_id, "default-user");
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut problem = shell();
        problem.function_signature = "def solve(nums):".to_string();

        problem.apply(ProblemPatch::solution("return 0"));

        assert_eq!(problem.solution.as_deref(), Some("return 0"));
        assert_eq!(problem.function_signature, "def solve(nums):");
        assert!(problem.problem_text.is_empty());
    }

    #[test]
    fn test_empty_patch() {
        assert!(ProblemPatch::default().is_empty());
        assert!(!ProblemPatch::problem_text("x").is_empty());
        assert!(ProblemPatch::default().with_model(None).is_empty());
    }

    #[test]
    fn test_new_test_case_defaults() {
        let case: NewTestCase =
            serde_json::from_str(r#"{"description": "single element"}"#).unwrap();
        assert!(!case.is_edge_case);
        assert!(!case.is_sample_case);
        assert!(case.input.is_null());
        assert!(case.input_code.is_none());
    }
}
