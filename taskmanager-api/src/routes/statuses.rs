/// Status endpoints
///
/// Every operation requires a signed-in user. A status still used by a task
/// cannot be deleted.
///
/// # Endpoints
///
/// - `GET /v1/statuses` - List statuses
/// - `POST /v1/statuses` - Create a status
/// - `PUT /v1/statuses/:id` - Rename a status
/// - `DELETE /v1/statuses/:id` - Delete an unused status

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    notice::{MutationResponse, NoticeKind},
    routes::{authorized, ensure_deletable},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use taskmanager_shared::{
    auth::{
        authorization::{Action, Location},
        middleware::Actor,
    },
    models::status::{CreateStatus, Status},
    restriction::DeleteTarget,
};
use uuid::Uuid;
use validator::Validate;

/// Create/rename body
#[derive(Debug, Deserialize, Validate)]
pub struct StatusRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
}

pub async fn list_statuses(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
) -> ApiResult<Json<Vec<Status>>> {
    authorized(&state.db, actor, Action::ListStatuses).await?;

    Ok(Json(Status::list(&state.db).await?))
}

/// Create a status
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Empty or overlong name
/// - `409 Conflict`: Name already taken
pub async fn create_status(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<MutationResponse<Status>> {
    let actor = authorized(&state.db, actor, Action::CreateStatus).await?;
    req.validate()?;

    let status = Status::create(&state.db, CreateStatus { name: req.name }).await?;
    tracing::info!(status_id = %status.id, user_id = %actor.id, "Status created");

    Ok(MutationResponse::success(
        "Status created successfully",
        Location::StatusList,
        status,
    ))
}

pub async fn update_status(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<MutationResponse<Status>> {
    let actor = authorized(&state.db, actor, Action::UpdateStatus).await?;
    req.validate()?;

    let status = Status::rename(&state.db, id, CreateStatus { name: req.name })
        .await?
        .ok_or_else(|| ApiError::NotFound("Status not found".to_string()))?;
    tracing::info!(status_id = %status.id, user_id = %actor.id, "Status renamed");

    Ok(MutationResponse::success(
        "Status changed successfully",
        Location::StatusList,
        status,
    ))
}

/// Delete a status
///
/// # Errors
///
/// - `404 Not Found`: No such status
/// - `409 Conflict`: A task still uses the status
pub async fn delete_status(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
) -> ApiResult<MutationResponse<()>> {
    let actor = authorized(&state.db, actor, Action::DeleteStatus).await?;

    if Status::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Status not found".to_string()));
    }

    ensure_deletable(&state.db, DeleteTarget::Status(id)).await?;

    Status::delete(&state.db, id).await?;
    tracing::info!(status_id = %id, user_id = %actor.id, "Status deleted");

    Ok(MutationResponse::notice(
        NoticeKind::Success,
        "Status deleted successfully",
        Location::StatusList,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_request_validation() {
        assert!(StatusRequest { name: "In progress".to_string() }.validate().is_ok());
        assert!(StatusRequest { name: String::new() }.validate().is_err());
        assert!(StatusRequest { name: "x".repeat(101) }.validate().is_err());
    }
}
