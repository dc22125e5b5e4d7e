/// Restriction policy: deletion preconditions
///
/// A status, label or user cannot be deleted while a task references it.
/// [`can_delete`] answers that question through the [`TaskReferences`]
/// trait, so the same policy runs against PostgreSQL in production and an
/// in-memory store in tests.
///
/// The database `ON DELETE RESTRICT` constraints remain the backstop when a
/// reference is added between the check and the delete.
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::restriction::{can_delete, DeleteTarget};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, label_id: Uuid) -> Result<(), sqlx::Error> {
/// if can_delete(&pool, DeleteTarget::Label(label_id)).await?.is_allowed() {
///     // safe to delete
/// }
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::authorization::{Decision, DenialKind, Location};
use crate::models::task::Task;

pub const STATUS_IN_USE_MESSAGE: &str = "Impossible to delete a status because it is in use";
pub const LABEL_IN_USE_MESSAGE: &str = "Impossible to delete a label because it is in use";
pub const USER_IN_USE_MESSAGE: &str = "Impossible to delete a user because it is in use";

/// Reference counts the restriction policy needs from the entity store
#[async_trait]
pub trait TaskReferences: Send + Sync {
    /// Number of tasks in the given status
    async fn tasks_with_status(&self, status_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Number of tasks carrying the given label
    async fn tasks_with_label(&self, label_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Number of tasks the user created
    async fn tasks_authored_by(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Number of tasks assigned to the user
    async fn tasks_performed_by(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl TaskReferences for PgPool {
    async fn tasks_with_status(&self, status_id: Uuid) -> Result<i64, sqlx::Error> {
        Task::count_by_status(self, status_id).await
    }

    async fn tasks_with_label(&self, label_id: Uuid) -> Result<i64, sqlx::Error> {
        Task::count_by_label(self, label_id).await
    }

    async fn tasks_authored_by(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        Task::count_by_author(self, user_id).await
    }

    async fn tasks_performed_by(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        Task::count_by_performer(self, user_id).await
    }
}

/// Entity about to be deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Status(Uuid),
    Label(Uuid),
    User(Uuid),
    Task(Uuid),
}

fn in_use(message: &str, redirect: Location) -> Decision {
    Decision::deny(DenialKind::RestrictedByReference, message, redirect)
}

/// Decides whether `target` may be deleted
///
/// - Status / Label: allowed iff no task references it
/// - User: allowed iff no task has the user as author or as performer
/// - Task: always allowed; authorship is gated by the guard layer
///
/// # Errors
///
/// Store faults propagate unchanged.
pub async fn can_delete<R>(refs: &R, target: DeleteTarget) -> Result<Decision, sqlx::Error>
where
    R: TaskReferences + ?Sized,
{
    let decision = match target {
        DeleteTarget::Status(id) => {
            if refs.tasks_with_status(id).await? > 0 {
                in_use(STATUS_IN_USE_MESSAGE, Location::StatusList)
            } else {
                Decision::Allow
            }
        }
        DeleteTarget::Label(id) => {
            if refs.tasks_with_label(id).await? > 0 {
                in_use(LABEL_IN_USE_MESSAGE, Location::LabelList)
            } else {
                Decision::Allow
            }
        }
        DeleteTarget::User(id) => {
            if refs.tasks_authored_by(id).await? > 0 || refs.tasks_performed_by(id).await? > 0 {
                in_use(USER_IN_USE_MESSAGE, Location::UserList)
            } else {
                Decision::Allow
            }
        }
        DeleteTarget::Task(_) => Decision::Allow,
    };

    Ok(decision)
}
