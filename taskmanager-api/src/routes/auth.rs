/// Authentication endpoints
///
/// Tokens are stateless: logging out only tells the client to discard them.
///
/// # Endpoints
///
/// - `POST /v1/auth/login` - Exchange username and password for tokens
/// - `POST /v1/auth/refresh` - Exchange a refresh token for an access token
/// - `POST /v1/auth/logout` - Acknowledge logout

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    notice::{MutationResponse, NoticeKind},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskmanager_shared::{
    auth::{authorization::Location, jwt, password},
    models::user::User,
};
use uuid::Uuid;
use validator::Validate;

const INVALID_CREDENTIALS: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

const UNKNOWN_SUBJECT: &str = "Token was issued to a user that no longer exists";

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Tokens issued on login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "jdoe",
///   "password": "svoboda"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "notice": { "kind": "success", "text": "You are logged in" },
///   "redirect": "/",
///   "data": { "user_id": "uuid", "access_token": "eyJ...", "refresh_token": "eyJ..." }
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Missing fields
/// - `401 Unauthorized`: Unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<MutationResponse<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    let (access_token, refresh_token) = jwt::issue_token_pair(user.id, state.jwt_secret())?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(MutationResponse::success(
        "You are logged in",
        Location::Home,
        LoginResponse {
            user_id: user.id,
            access_token,
            refresh_token,
        },
    ))
}

/// Token refresh endpoint
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or non-refresh token, or the
///   user it was issued to no longer exists
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    if User::find_by_id(&state.db, claims.sub).await?.is_none() {
        tracing::info!(user_id = %claims.sub, "Refresh for a deleted user refused");
        return Err(ApiError::Unauthorized(UNKNOWN_SUBJECT.to_string()));
    }

    let access_token = jwt::create_token(
        &jwt::Claims::new(claims.sub, jwt::TokenType::Access),
        state.jwt_secret(),
    )?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Logout endpoint
///
/// Always succeeds, signed in or not.
pub async fn logout() -> MutationResponse<()> {
    MutationResponse::notice(NoticeKind::Info, "You are logged out", Location::Home)
}
