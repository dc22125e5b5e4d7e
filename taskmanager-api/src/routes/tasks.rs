/// Task endpoints
///
/// Any signed-in user may list, view, create and update tasks; only the
/// author may delete one. The creating actor becomes the author and stays
/// the author across updates.
///
/// # Endpoints
///
/// - `GET /v1/tasks?status=&performer=&labels=&self_tasks=` - Filtered listing
/// - `POST /v1/tasks` - Create a task
/// - `GET /v1/tasks/:id` - Task detail with names resolved
/// - `PUT /v1/tasks/:id` - Update a task
/// - `DELETE /v1/tasks/:id` - Delete a task (author only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    notice::{MutationResponse, NoticeKind},
    routes::{authenticated, authorized, ensure_deletable},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use taskmanager_shared::{
    auth::{
        authorization::{authorize, Action, Location},
        middleware::Actor,
    },
    filter::TaskFilter,
    models::{
        label::Label,
        status::Status,
        task::{Task, TaskInput},
        user::User,
    },
    restriction::DeleteTarget,
};
use uuid::Uuid;
use validator::Validate;

/// Create/update body
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1 to 150 characters"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Status ID
    pub status: Uuid,

    /// Performer user ID
    #[serde(default)]
    pub performer: Option<Uuid>,

    /// Label IDs
    #[serde(default)]
    pub labels: Vec<Uuid>,
}

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

impl TaskRequest {
    /// Validates fields and checks that every referenced row exists
    async fn into_input(mut self, db: &PgPool) -> ApiResult<TaskInput> {
        self.validate()?;

        let mut errors = Vec::new();
        let mut invalid = |field: &str| {
            errors.push(ValidationErrorDetail {
                field: field.to_string(),
                message: INVALID_CHOICE.to_string(),
            })
        };

        if Status::find_by_id(db, self.status).await?.is_none() {
            invalid("status");
        }

        if let Some(performer) = self.performer {
            if User::find_by_id(db, performer).await?.is_none() {
                invalid("performer");
            }
        }

        self.labels.sort();
        self.labels.dedup();
        if Label::find_many(db, &self.labels).await?.len() != self.labels.len() {
            invalid("labels");
        }

        if !errors.is_empty() {
            return Err(ApiError::ValidationError(errors));
        }

        Ok(TaskInput {
            name: self.name,
            description: self.description,
            status_id: self.status,
            performer_id: self.performer,
            label_ids: self.labels,
        })
    }
}

/// User reference shown on a task
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub full_name: String,
}

impl From<User> for UserRef {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            id: user.id,
        }
    }
}

/// Task with author, performer, status and labels resolved
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub author: UserRef,
    pub performer: Option<UserRef>,
    pub status: Status,
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
}

async fn find_task(db: &PgPool, id: Uuid) -> ApiResult<Task> {
    Task::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Filtered task listing
///
/// Criteria come from the query string; see [`TaskFilter`]. Results keep
/// creation order.
pub async fn list_tasks(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Query(filter): Query<TaskFilter>,
) -> ApiResult<Json<Vec<Task>>> {
    let actor = authorized(&state.db, actor, Action::ListTasks).await?;

    let tasks = Task::list(&state.db).await?;
    tracing::debug!(?filter, total = tasks.len(), "Filtering tasks");

    Ok(Json(filter.apply(tasks, actor.id)))
}

/// Task detail
pub async fn get_task(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetail>> {
    authorized(&state.db, actor, Action::ViewTask).await?;

    let task = find_task(&state.db, id).await?;

    let author = User::find_by_id(&state.db, task.author_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    let performer = match task.performer_id {
        Some(performer_id) => User::find_by_id(&state.db, performer_id)
            .await?
            .map(UserRef::from),
        None => None,
    };

    let status = Status::find_by_id(&state.db, task.status_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    let labels = Label::find_many(&state.db, &task.label_ids).await?;

    Ok(Json(TaskDetail {
        id: task.id,
        name: task.name,
        description: task.description,
        author: author.into(),
        performer,
        status,
        labels,
        created_at: task.created_at,
    }))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Content-Type: application/json
///
/// {
///   "name": "Fix login page",
///   "description": "",
///   "status": "uuid",
///   "performer": "uuid",
///   "labels": ["uuid"]
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Invalid name or unknown status/performer/label
/// - `409 Conflict`: Name already taken
pub async fn create_task(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<MutationResponse<Task>> {
    let actor = authorized(&state.db, actor, Action::CreateTask).await?;
    let input = req.into_input(&state.db).await?;

    let task = Task::create(&state.db, actor.id, input).await?;
    tracing::info!(task_id = %task.id, user_id = %actor.id, "Task created");

    Ok(MutationResponse::success(
        "Task created successfully",
        Location::TaskList,
        task,
    ))
}

/// Update a task
///
/// Open to any signed-in user, not just the author. Deleting is
/// author-only; updating deliberately is not.
///
/// # Errors
///
/// - `404 Not Found`: No such task (checked before the body's references)
/// - `422 Unprocessable Entity`: Invalid name or unknown status/performer/label
pub async fn update_task(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskRequest>,
) -> ApiResult<MutationResponse<Task>> {
    let actor = authorized(&state.db, actor, Action::UpdateTask).await?;
    find_task(&state.db, id).await?;
    let input = req.into_input(&state.db).await?;

    let task = Task::update(&state.db, id, input)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    tracing::info!(task_id = %task.id, user_id = %actor.id, "Task updated");

    Ok(MutationResponse::success(
        "Task changed successfully",
        Location::TaskList,
        task,
    ))
}

/// Delete a task
///
/// # Errors
///
/// - `401 Unauthorized`: Not signed in (checked before the lookup)
/// - `404 Not Found`: No such task
/// - `403 Forbidden`: The actor is not the author
pub async fn delete_task(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
) -> ApiResult<MutationResponse<()>> {
    let actor = authenticated(&state.db, actor).await?;
    let task = find_task(&state.db, id).await?;

    authorize(
        Some(&actor),
        Action::DeleteTask {
            author_id: task.author_id,
        },
    )
    .into_result()
    .map_err(|denial| {
        tracing::warn!(task_id = %id, user_id = %actor.id, "Task delete by non-author denied");
        ApiError::Denied(denial)
    })?;

    ensure_deletable(&state.db, DeleteTarget::Task(id)).await?;

    Task::delete(&state.db, id).await?;
    tracing::info!(task_id = %id, user_id = %actor.id, "Task deleted");

    Ok(MutationResponse::notice(
        NoticeKind::Success,
        "Task deleted successfully",
        Location::TaskList,
    ))
}
