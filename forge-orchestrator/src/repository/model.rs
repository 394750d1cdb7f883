//! Model Repository
//!
//! Handles all database operations related to models.

use forge_core::domain::model::Model;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new model
pub async fn create(pool: &PgPool, name: &str) -> Result<Model, sqlx::Error> {
    let model = Model {
        id: Uuid::new_v4(),
        name: name.to_string(),
        created_at: chrono::Utc::now(),
    };

    sqlx::query("INSERT INTO models (id, name, created_at) VALUES ($1, $2, $3)")
        .bind(model.id)
        .bind(&model.name)
        .bind(model.created_at)
        .execute(pool)
        .await?;

    Ok(model)
}

/// Find a model by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Model>, sqlx::Error> {
    let row = sqlx::query_as::<_, ModelRow>("SELECT id, name, created_at FROM models WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.into()))
}

/// Find a model by name
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Model>, sqlx::Error> {
    let row =
        sqlx::query_as::<_, ModelRow>("SELECT id, name, created_at FROM models WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|r| r.into()))
}

/// List all models by name
pub async fn list_all(pool: &PgPool) -> Result<Vec<Model>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ModelRow>("SELECT id, name, created_at FROM models ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ModelRow {
    id: Uuid,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ModelRow> for Model {
    fn from(row: ModelRow) -> Self {
        Model {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}
