/// Task model and database operations
///
/// A task has a mandatory author and status, an optional performer, and any
/// number of labels. Tasks are listed in creation order, which is also the
/// order the task filter preserves.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(150) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     status_id UUID NOT NULL REFERENCES statuses(id) ON DELETE RESTRICT,
///     performer_id UUID REFERENCES users(id) ON DELETE RESTRICT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::task::{Task, TaskInput};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, author: Uuid, status: Uuid, label: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, author, TaskInput {
///     name: "Fix login page".to_string(),
///     description: String::new(),
///     status_id: status,
///     performer_id: None,
///     label_ids: vec![label],
/// }).await?;
///
/// assert_eq!(task.author_id, author);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const SELECT_TASKS: &str = r#"
    SELECT t.id, t.name, t.description, t.author_id, t.status_id, t.performer_id,
           COALESCE(
               ARRAY_AGG(tl.label_id ORDER BY tl.label_id) FILTER (WHERE tl.label_id IS NOT NULL),
               '{}'
           ) AS label_ids,
           t.created_at, t.updated_at
    FROM tasks t
    LEFT JOIN task_labels tl ON tl.task_id = t.id
"#;

/// Task model with its label set resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short task name
    pub name: String,

    /// Free-form description (may be empty)
    pub description: String,

    /// User who created the task
    pub author_id: Uuid,

    /// Current status
    pub status_id: Uuid,

    /// User assigned to the task, if any
    pub performer_id: Option<Uuid>,

    /// Labels attached to the task, ordered by ID
    pub label_ids: Vec<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Editable task fields, shared by create and update
///
/// The author is never part of the input: it is the creating actor and
/// stays fixed across updates.
#[derive(Debug, Clone)]
pub struct TaskInput {
    pub name: String,
    pub description: String,
    pub status_id: Uuid,
    pub performer_id: Option<Uuid>,
    pub label_ids: Vec<Uuid>,
}

impl Task {
    /// Checks whether the task carries the given label
    pub fn has_label(&self, label_id: Uuid) -> bool {
        self.label_ids.contains(&label_id)
    }

    /// Creates a task authored by `author_id` together with its label rows
    ///
    /// The task row and the label rows are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns a foreign-key violation if the status, performer or a label
    /// does not exist.
    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        data: TaskInput,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO tasks (name, description, author_id, status_id, performer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(author_id)
        .bind(data.status_id)
        .bind(data.performer_id)
        .fetch_one(&mut *tx)
        .await?;

        replace_labels(&mut tx, id, &data.label_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("{SELECT_TASKS} WHERE t.id = $1 GROUP BY t.id");

        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all tasks in creation order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("{SELECT_TASKS} GROUP BY t.id ORDER BY t.created_at ASC, t.id ASC");

        sqlx::query_as::<_, Task>(&query).fetch_all(pool).await
    }

    /// Replaces a task's editable fields and label set
    ///
    /// The author is left untouched.
    ///
    /// # Returns
    ///
    /// The updated task, or None if it doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: TaskInput,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE tasks
            SET name = $2,
                description = $3,
                status_id = $4,
                performer_id = $5,
                updated_at = clock_timestamp()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.status_id)
        .bind(data.performer_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        replace_labels(&mut tx, id, &data.label_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id).await
    }

    /// Deletes a task
    ///
    /// Label rows cascade with the task.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts tasks in the given status
    pub async fn count_by_status(pool: &PgPool, status_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE status_id = $1")
            .bind(status_id)
            .fetch_one(pool)
            .await
    }

    /// Counts tasks carrying the given label
    pub async fn count_by_label(pool: &PgPool, label_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM task_labels WHERE label_id = $1")
            .bind(label_id)
            .fetch_one(pool)
            .await
    }

    /// Counts tasks created by the given user
    pub async fn count_by_author(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE author_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Counts tasks assigned to the given user
    pub async fn count_by_performer(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE performer_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}

async fn replace_labels(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    label_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM task_labels WHERE task_id = $1")
        .bind(task_id)
        .execute(&mut **tx)
        .await?;

    if label_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO task_labels (task_id, label_id)
        SELECT $1, label_id FROM UNNEST($2::uuid[]) AS label_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(task_id)
    .bind(label_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
