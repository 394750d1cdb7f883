//! Prompt construction and completion parsing for each generation step

use forge_core::domain::focus_area::FocusArea;
use forge_core::domain::problem::NewTestCase;

/// Prompt for `generate_text`
///
/// Without focus areas the prompt carries no focus clause at all.
pub fn problem_text(focus_areas: &[FocusArea]) -> String {
    let mut prompt = String::from("Generate a coding interview problem");

    if !focus_areas.is_empty() {
        let clauses: Vec<&str> = focus_areas.iter().map(FocusArea::prompt_clause).collect();
        prompt.push_str(" focusing on: ");
        prompt.push_str(&clauses.join(", "));
    }

    prompt.push_str(". Include a clear problem statement, input/output format, and examples.");
    prompt
}

/// Prompt for `generate_solution`
pub fn solution(problem_text: &str) -> String {
    format!(
        "Generate a solution in Python for this problem:\n\n{}\n\nProvide only the code.",
        problem_text
    )
}

/// Prompt for `generate_test_cases`
pub fn test_cases(problem_text: &str, solution: Option<&str>) -> String {
    let mut prompt = format!(
        "Generate test cases for this coding problem:\n\n{}\n\n",
        problem_text
    );

    if let Some(solution) = solution {
        prompt.push_str("Reference solution:\n\n");
        prompt.push_str(solution);
        prompt.push_str("\n\n");
    }

    prompt.push_str(
        "Respond with only a JSON array. Each element must be an object with the keys \
         \"description\" (string), \"is_edge_case\" (boolean), \"is_sample_case\" (boolean), \
         \"input\" (JSON value) and \"expected\" (JSON value).",
    );
    prompt
}

/// Parse the JSON array returned for `generate_test_cases`
///
/// Models often wrap JSON in a markdown fence; the fence is stripped first.
pub fn parse_test_cases(completion: &str) -> Result<Vec<NewTestCase>, String> {
    let body = strip_code_fence(completion);

    let cases: Vec<NewTestCase> = serde_json::from_str(body)
        .map_err(|e| format!("test cases are not a valid JSON array: {}", e))?;

    if cases.is_empty() {
        return Err("test case array is empty".to_string());
    }

    Ok(cases)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (```json) up to the first newline
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };

    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
