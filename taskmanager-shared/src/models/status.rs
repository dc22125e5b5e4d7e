/// Status model and database operations
///
/// Every task carries exactly one status. A status cannot be deleted while a
/// task references it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE statuses (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Named task status (e.g. "new", "in progress", "done")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Status {
    /// Unique status ID
    pub id: Uuid,

    /// Status name, unique across all statuses
    pub name: String,

    /// When the status was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating or renaming a status
#[derive(Debug, Clone)]
pub struct CreateStatus {
    pub name: String,
}

impl Status {
    /// Creates a new status
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateStatus) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Status>(
            r#"
            INSERT INTO statuses (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(data.name)
        .fetch_one(pool)
        .await
    }

    /// Finds a status by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Status>("SELECT id, name, created_at FROM statuses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all statuses in creation order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Status>(
            "SELECT id, name, created_at FROM statuses ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Renames a status
    ///
    /// # Returns
    ///
    /// The updated status, or None if it doesn't exist
    pub async fn rename(
        pool: &PgPool,
        id: Uuid,
        data: CreateStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Status>(
            r#"
            UPDATE statuses
            SET name = $2
            WHERE id = $1
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a status
    ///
    /// # Returns
    ///
    /// True if the status was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
