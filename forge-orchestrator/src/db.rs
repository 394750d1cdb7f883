use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

use crate::store::DEFAULT_FOCUS_AREAS;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create models table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS models (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create focus areas table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS focus_areas (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            slug VARCHAR(255) NOT NULL UNIQUE,
            description TEXT,
            prompt_guidance TEXT NOT NULL DEFAULT '',
            display_order INTEGER NOT NULL DEFAULT 0,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create problems table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS problems (
            id UUID PRIMARY KEY,
            problem_text TEXT NOT NULL DEFAULT '',
            function_signature TEXT NOT NULL DEFAULT '',
            function_signature_schema JSONB,
            problem_text_reworded TEXT NOT NULL DEFAULT '',
            solution TEXT,
            generated_by_model_id UUID REFERENCES models(id) ON DELETE SET NULL,
            generated_by_user_id VARCHAR(255) NOT NULL,
            easier_than UUID REFERENCES problems(id) ON DELETE SET NULL,
            harder_than UUID REFERENCES problems(id) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create problem/focus area link table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS problem_focus_areas (
            id UUID PRIMARY KEY,
            problem_id UUID NOT NULL REFERENCES problems(id) ON DELETE CASCADE,
            focus_area_id UUID NOT NULL REFERENCES focus_areas(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL,
            UNIQUE (problem_id, focus_area_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create test cases table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS test_cases (
            id UUID PRIMARY KEY,
            problem_id UUID NOT NULL REFERENCES problems(id) ON DELETE CASCADE,
            description TEXT NOT NULL,
            is_edge_case BOOLEAN NOT NULL DEFAULT FALSE,
            is_sample_case BOOLEAN NOT NULL DEFAULT FALSE,
            input_code TEXT,
            input JSONB NOT NULL DEFAULT 'null',
            expected JSONB NOT NULL DEFAULT 'null',
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create generation jobs table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS generation_jobs (
            id UUID PRIMARY KEY,
            problem_id UUID NOT NULL REFERENCES problems(id) ON DELETE CASCADE,
            model_id UUID REFERENCES models(id) ON DELETE SET NULL,
            status VARCHAR(50) NOT NULL,
            current_step VARCHAR(100),
            completed_steps TEXT[] NOT NULL DEFAULT '{}',
            error TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for better query performance
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_generation_jobs_problem ON generation_jobs(problem_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_generation_jobs_status ON generation_jobs(status)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_test_cases_problem ON test_cases(problem_id, created_at)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_problems_created_at ON problems(created_at DESC)")
        .execute(pool)
        .await?;

    seed_focus_areas(pool).await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Insert the default focus areas, leaving existing slugs untouched
async fn seed_focus_areas(pool: &PgPool) -> Result<(), sqlx::Error> {
    let now = chrono::Utc::now();

    for (order, (name, slug, guidance)) in DEFAULT_FOCUS_AREAS.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO focus_areas (id, name, slug, prompt_guidance, display_order, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(*name)
        .bind(*slug)
        .bind(*guidance)
        .bind(order as i32)
        .bind(now)
        .execute(pool)
        .await?;
    }

    Ok(())
}
