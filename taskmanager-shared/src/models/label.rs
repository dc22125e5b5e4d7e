/// Label model and database operations
///
/// Labels tag tasks many-to-many through the `task_labels` join table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE labels (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
/// );
///
/// CREATE TABLE task_labels (
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     label_id UUID NOT NULL REFERENCES labels(id) ON DELETE RESTRICT,
///     PRIMARY KEY (task_id, label_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Named task label (e.g. "bug", "feature")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    pub id: Uuid,

    /// Label name, unique across all labels
    pub name: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating or renaming a label
#[derive(Debug, Clone)]
pub struct CreateLabel {
    pub name: String,
}

impl Label {
    /// Creates a new label
    pub async fn create(pool: &PgPool, data: CreateLabel) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Label>(
            "INSERT INTO labels (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(data.name)
        .fetch_one(pool)
        .await
    }

    /// Finds a label by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds every label whose ID is in `ids`
    ///
    /// Missing IDs are silently skipped; callers compare lengths to detect them.
    pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Label>(
            "SELECT id, name, created_at FROM labels WHERE id = ANY($1) ORDER BY created_at ASC, id ASC",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Lists all labels in creation order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Label>(
            "SELECT id, name, created_at FROM labels ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Renames a label
    pub async fn rename(
        pool: &PgPool,
        id: Uuid,
        data: CreateLabel,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Label>(
            "UPDATE labels SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
        )
        .bind(id)
        .bind(data.name)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a label
    ///
    /// ⚠️  Fails with a foreign-key violation if a task still carries the label.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM labels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
