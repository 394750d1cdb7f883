//! Test Case Repository
//!
//! Handles all database operations related to test cases.

use forge_core::domain::problem::TestCase;
use sqlx::PgPool;
use uuid::Uuid;

/// Find all test cases for a problem, oldest first
pub async fn find_by_problem(pool: &PgPool, problem_id: Uuid) -> Result<Vec<TestCase>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TestCaseRow>(
        r#"
        SELECT id, problem_id, description, is_edge_case, is_sample_case,
               input_code, input, expected, created_at, updated_at
        FROM test_cases
        WHERE problem_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(problem_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Replace every test case of a problem in one transaction
pub async fn replace_for_problem(
    pool: &PgPool,
    problem_id: Uuid,
    cases: &[TestCase],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM test_cases WHERE problem_id = $1")
        .bind(problem_id)
        .execute(&mut *tx)
        .await?;

    for case in cases {
        sqlx::query(
            r#"
            INSERT INTO test_cases (id, problem_id, description, is_edge_case, is_sample_case,
                                    input_code, input, expected, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(case.id)
        .bind(problem_id)
        .bind(&case.description)
        .bind(case.is_edge_case)
        .bind(case.is_sample_case)
        .bind(&case.input_code)
        .bind(&case.input)
        .bind(&case.expected)
        .bind(case.created_at)
        .bind(case.updated_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct TestCaseRow {
    id: Uuid,
    problem_id: Uuid,
    description: String,
    is_edge_case: bool,
    is_sample_case: bool,
    input_code: Option<String>,
    input: serde_json::Value,
    expected: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<TestCaseRow> for TestCase {
    fn from(row: TestCaseRow) -> Self {
        TestCase {
            id: row.id,
            problem_id: row.problem_id,
            description: row.description,
            is_edge_case: row.is_edge_case,
            is_sample_case: row.is_sample_case,
            input_code: row.input_code,
            input: row.input,
            expected: row.expected,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
