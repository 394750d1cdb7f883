//! Problem Repository
//!
//! Handles all database operations related to problems.

use forge_core::domain::problem::{Problem, ProblemPatch};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Insert a new problem
pub async fn create(pool: &PgPool, problem: &Problem) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO problems (id, problem_text, function_signature, function_signature_schema,
                              problem_text_reworded, solution, generated_by_model_id,
                              generated_by_user_id, easier_than, harder_than, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(problem.id)
    .bind(&problem.problem_text)
    .bind(&problem.function_signature)
    .bind(&problem.function_signature_schema)
    .bind(&problem.problem_text_reworded)
    .bind(&problem.solution)
    .bind(problem.generated_by_model_id)
    .bind(&problem.generated_by_user_id)
    .bind(problem.easier_than)
    .bind(problem.harder_than)
    .bind(problem.created_at)
    .bind(problem.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Find a problem by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Problem>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProblemRow>(
        r#"
        SELECT id, problem_text, function_signature, function_signature_schema,
               problem_text_reworded, solution, generated_by_model_id,
               generated_by_user_id, easier_than, harder_than, created_at, updated_at
        FROM problems
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all problem IDs, newest first
pub async fn list_ids(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM problems ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Apply a field patch in a single UPDATE statement
///
/// Returns false when the problem does not exist.
pub async fn update(pool: &PgPool, id: Uuid, patch: &ProblemPatch) -> Result<bool, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("UPDATE problems SET updated_at = ");
    builder.push_bind(chrono::Utc::now());

    if let Some(text) = &patch.problem_text {
        builder.push(", problem_text = ").push_bind(text.clone());
    }
    if let Some(signature) = &patch.function_signature {
        builder.push(", function_signature = ").push_bind(signature.clone());
    }
    if let Some(schema) = &patch.function_signature_schema {
        builder
            .push(", function_signature_schema = ")
            .push_bind(schema.clone());
    }
    if let Some(reworded) = &patch.problem_text_reworded {
        builder
            .push(", problem_text_reworded = ")
            .push_bind(reworded.clone());
    }
    if let Some(solution) = &patch.solution {
        builder.push(", solution = ").push_bind(solution.clone());
    }
    if let Some(model_id) = patch.generated_by_model_id {
        builder.push(", generated_by_model_id = ").push_bind(model_id);
    }

    builder.push(" WHERE id = ").push_bind(id);

    let result = builder.build().execute(pool).await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ProblemRow {
    id: Uuid,
    problem_text: String,
    function_signature: String,
    function_signature_schema: Option<serde_json::Value>,
    problem_text_reworded: String,
    solution: Option<String>,
    generated_by_model_id: Option<Uuid>,
    generated_by_user_id: String,
    easier_than: Option<Uuid>,
    harder_than: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProblemRow> for Problem {
    fn from(row: ProblemRow) -> Self {
        Problem {
            id: row.id,
            problem_text: row.problem_text,
            function_signature: row.function_signature,
            function_signature_schema: row.function_signature_schema,
            problem_text_reworded: row.problem_text_reworded,
            solution: row.solution,
            generated_by_model_id: row.generated_by_model_id,
            generated_by_user_id: row.generated_by_user_id,
            easier_than: row.easier_than,
            harder_than: row.harder_than,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
