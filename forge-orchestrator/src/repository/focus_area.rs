//! Focus Area Repository
//!
//! Handles all database operations related to focus areas and their links
//! to problems.

use forge_core::domain::focus_area::FocusArea;
use sqlx::PgPool;
use uuid::Uuid;

/// List active focus areas in display order
pub async fn list_active(pool: &PgPool) -> Result<Vec<FocusArea>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FocusAreaRow>(
        r#"
        SELECT id, name, slug, description, prompt_guidance, display_order,
               is_active, created_at, updated_at
        FROM focus_areas
        WHERE is_active = TRUE
        ORDER BY display_order ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Find the focus areas linked to a problem
pub async fn find_for_problem(pool: &PgPool, problem_id: Uuid) -> Result<Vec<FocusArea>, sqlx::Error> {
    let rows = sqlx::query_as::<_, FocusAreaRow>(
        r#"
        SELECT fa.id, fa.name, fa.slug, fa.description, fa.prompt_guidance,
               fa.display_order, fa.is_active, fa.created_at, fa.updated_at
        FROM focus_areas fa
        INNER JOIN problem_focus_areas pfa ON pfa.focus_area_id = fa.id
        WHERE pfa.problem_id = $1
        ORDER BY fa.display_order ASC
        "#,
    )
    .bind(problem_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Link existing focus areas to a problem
///
/// IDs that do not name a focus area, or are already linked, are skipped.
/// Returns the number of links created.
pub async fn link_to_problem(
    pool: &PgPool,
    problem_id: Uuid,
    focus_area_ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    if focus_area_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO problem_focus_areas (id, problem_id, focus_area_id, created_at)
        SELECT gen_random_uuid(), $1, fa.id, $2
        FROM focus_areas fa
        WHERE fa.id = ANY($3)
        ON CONFLICT (problem_id, focus_area_id) DO NOTHING
        "#,
    )
    .bind(problem_id)
    .bind(chrono::Utc::now())
    .bind(focus_area_ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct FocusAreaRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    prompt_guidance: String,
    display_order: i32,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<FocusAreaRow> for FocusArea {
    fn from(row: FocusAreaRow) -> Self {
        FocusArea {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            prompt_guidance: row.prompt_guidance,
            display_order: row.display_order,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
