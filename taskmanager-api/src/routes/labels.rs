/// Label endpoints
///
/// # Endpoints
///
/// - `GET /v1/labels` - List labels
/// - `POST /v1/labels` - Create a label
/// - `PUT /v1/labels/:id` - Rename a label
/// - `DELETE /v1/labels/:id` - Delete a label no task carries

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
    models::label::{CreateLabel, Label},
    restriction::DeleteTarget,
};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LabelRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
}

pub async fn list_labels(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
) -> ApiResult<Json<Vec<Label>>> {
    authorized(&state.db, actor, Action::ListLabels).await?;

    Ok(Json(Label::list(&state.db).await?))
}

pub async fn create_label(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Json(req): Json<LabelRequest>,
) -> ApiResult<MutationResponse<Label>> {
    let actor = authorized(&state.db, actor, Action::CreateLabel).await?;
    req.validate()?;

    let label = Label::create(&state.db, CreateLabel { name: req.name }).await?;
    tracing::info!(label_id = %label.id, user_id = %actor.id, "Label created");

    Ok(MutationResponse::success(
        "Label created successfully",
        Location::LabelList,
        label,
    ))
}

pub async fn update_label(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
    Json(req): Json<LabelRequest>,
) -> ApiResult<MutationResponse<Label>> {
    let actor = authorized(&state.db, actor, Action::UpdateLabel).await?;
    req.validate()?;

    let label = Label::rename(&state.db, id, CreateLabel { name: req.name })
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;
    tracing::info!(label_id = %label.id, user_id = %actor.id, "Label renamed");

    Ok(MutationResponse::success(
        "Label changed successfully",
        Location::LabelList,
        label,
    ))
}

/// Delete a label
///
/// Refused with `409 Conflict` while any task carries the label.
pub async fn delete_label(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
) -> ApiResult<MutationResponse<()>> {
    let actor = authorized(&state.db, actor, Action::DeleteLabel).await?;

    if Label::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Label not found".to_string()));
    }

    ensure_deletable(&state.db, DeleteTarget::Label(id)).await?;

    Label::delete(&state.db, id).await?;
    tracing::info!(label_id = %id, user_id = %actor.id, "Label deleted");

    Ok(MutationResponse::notice(
        NoticeKind::Success,
        "Label deleted successfully",
        Location::LabelList,
    ))
}
