/// User endpoints
///
/// Listing and registration are public. Updating or deleting an account is
/// self-service only: the actor must be the target user, and a user still
/// referenced by a task (as author or performer) cannot be deleted.
///
/// # Endpoints
///
/// - `GET /v1/users` - List users
/// - `POST /v1/users` - Register a new user
/// - `PUT /v1/users/:id` - Update own account
/// - `DELETE /v1/users/:id` - Delete own account

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
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use taskmanager_shared::{
    auth::{
        authorization::{Action, Location},
        middleware::Actor,
        password,
    },
    models::user::{CreateUser, UpdateUser, User},
    restriction::DeleteTarget,
};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            id: user.id,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Registration and profile update body
#[derive(Debug, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1 to 150 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(length(min = 1, max = 150, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 150, message = "Last name is required"))]
    pub last_name: String,

    /// Checked against the password policy, not by `validate()`
    pub password: String,

    pub password_confirmation: String,
}

/// Letters, digits and `@ . + - _` only
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || "@.+-_".contains(c);

    if username.chars().all(allowed) {
        return Ok(());
    }

    let mut error = ValidationError::new("username");
    error.message = Some(Cow::Borrowed(
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
    ));
    Err(error)
}

impl UserRequest {
    /// Field validation plus the password policy; returns the password hash
    fn validated_password_hash(&self) -> ApiResult<String> {
        self.validate()?;

        password::validate_new_password(&self.password, &self.password_confirmation)
            .map_err(|message| ApiError::invalid_field("password", message))?;

        Ok(password::hash_password(&self.password)?)
    }
}

/// List users
///
/// Public; users are shown by full name in registration order.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserView>>> {
    let users = User::list(&state.db).await?;

    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/users
/// Content-Type: application/json
///
/// {
///   "username": "jdoe",
///   "first_name": "John",
///   "last_name": "Doe",
///   "password": "svoboda",
///   "password_confirmation": "svoboda"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Username already taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<UserRequest>,
) -> ApiResult<MutationResponse<UserView>> {
    let password_hash = req.validated_password_hash()?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(MutationResponse::success(
        "User registered successfully",
        Location::Login,
        user.into(),
    ))
}

/// Update own account
///
/// The actor must be the target user. Username, names and password are all
/// replaced.
pub async fn update_user(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UserRequest>,
) -> ApiResult<MutationResponse<UserView>> {
    authorized(&state.db, actor, Action::UpdateUser { target: id }).await?;

    let password_hash = req.validated_password_hash()?;

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, "User updated");

    Ok(MutationResponse::success(
        "User changed successfully",
        Location::UserList,
        user.into(),
    ))
}

/// Delete own account
///
/// # Errors
///
/// - `401`/`403`: Not signed in, or not this user
/// - `409 Conflict`: The user is an author or performer of some task
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<Uuid>,
) -> ApiResult<MutationResponse<()>> {
    authorized(&state.db, actor, Action::DeleteUser { target: id }).await?;

    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    ensure_deletable(&state.db, DeleteTarget::User(id)).await?;

    User::delete(&state.db, id).await?;
    tracing::info!(user_id = %id, "User deleted");

    Ok(MutationResponse::notice(
        NoticeKind::Success,
        "User deleted successfully",
        Location::UserList,
    ))
}
