/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login, token refresh, logout
/// - `users`: Registration and self-service profile changes
/// - `statuses`: Task statuses
/// - `labels`: Task labels
/// - `tasks`: Tasks, including the filtered listing
///
/// Every guarded handler follows the same order: resolve the actor, run the
/// guard chain, run the restriction policy (deletes only), then mutate.

pub mod auth;
pub mod health;
pub mod labels;
pub mod statuses;
pub mod tasks;
pub mod users;

use axum::Extension;
use sqlx::PgPool;
use taskmanager_shared::{
    auth::{
        authorization::{authorize, require_authenticated, Action, Decision, Denial},
        middleware::Actor,
    },
    models::user::User,
    restriction::{can_delete, DeleteTarget},
};

use crate::error::{ApiError, ApiResult};

fn denied(denial: Denial) -> ApiError {
    tracing::warn!(
        kind = ?denial.kind,
        redirect = %denial.redirect,
        message = %denial.message,
        "Request denied"
    );
    ApiError::Denied(denial)
}

fn unauthenticated() -> ApiError {
    match require_authenticated(None) {
        Decision::Deny(denial) => denied(denial),
        Decision::Allow => ApiError::InternalError(
            "authentication guard allowed an anonymous request".to_string(),
        ),
    }
}

/// Token-level check: the request carries an actor at all
fn require_actor(actor: Option<Extension<Actor>>) -> ApiResult<Actor> {
    actor.map(|Extension(actor)| actor).ok_or_else(unauthenticated)
}

/// Action guard for an actor already known to exist
fn permit(actor: &Actor, action: Action) -> ApiResult<()> {
    authorize(Some(actor), action).into_result().map_err(denied)
}

/// Authentication guard; yields the actor on success
///
/// A token whose subject has since been deleted counts as anonymous.
pub(crate) async fn authenticated(
    db: &PgPool,
    actor: Option<Extension<Actor>>,
) -> ApiResult<Actor> {
    let actor = require_actor(actor)?;

    if User::find_by_id(db, actor.id).await?.is_none() {
        tracing::info!(user_id = %actor.id, "Token subject no longer exists");
        return Err(unauthenticated());
    }

    Ok(actor)
}

/// Full guard chain for `action`; yields the actor on success
pub(crate) async fn authorized(
    db: &PgPool,
    actor: Option<Extension<Actor>>,
    action: Action,
) -> ApiResult<Actor> {
    let actor = authenticated(db, actor).await?;
    permit(&actor, action)?;

    Ok(actor)
}

/// Restriction policy check before a delete
pub(crate) async fn ensure_deletable(db: &PgPool, target: DeleteTarget) -> ApiResult<()> {
    can_delete(db, target).await?.into_result().map_err(denied)
}
