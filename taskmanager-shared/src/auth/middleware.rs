/// Identity resolution middleware for Axum
///
/// Every request passes through [`identity_middleware`]. A valid access token
/// in `Authorization: Bearer <token>` puts an [`Actor`] into the request
/// extensions. A missing, malformed, expired or refresh-type token leaves the
/// request anonymous; rejecting it is the guard layer's job, not this one's.
///
/// The actor is only as fresh as its token. Handlers confirm the user still
/// exists before trusting it.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware, Extension};
/// use taskmanager_shared::auth::middleware::{create_identity_middleware, Actor};
///
/// async fn whoami(actor: Option<Extension<Actor>>) -> String {
///     match actor {
///         Some(Extension(actor)) => format!("user {}", actor.id),
///         None => "anonymous".to_string(),
///     }
/// }
///
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn(create_identity_middleware("your-jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::validate_access_token;

/// The identity associated with the current request
///
/// Handlers extract it as `Option<Extension<Actor>>`; `None` means the
/// request is anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Authenticated user ID
    pub id: Uuid,
}

impl Actor {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Extracts the bearer token from an `Authorization` header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the current actor from request headers
///
/// Returns `None` unless the headers carry a valid access token.
pub fn resolve_actor(headers: &HeaderMap, secret: &str) -> Option<Actor> {
    let token = bearer_token(headers)?;

    match validate_access_token(token, secret) {
        Ok(claims) => Some(Actor::new(claims.sub)),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid bearer token");
            None
        }
    }
}

/// Identity middleware
///
/// Never rejects a request. Inserts [`Actor`] into the request extensions
/// when [`resolve_actor`] succeeds.
pub async fn identity_middleware(secret: String, mut req: Request, next: Next) -> Response {
    if let Some(actor) = resolve_actor(req.headers(), &secret) {
        req.extensions_mut().insert(actor);
    }

    next.run(req).await
}

/// Creates an identity middleware closure capturing the JWT secret
pub fn create_identity_middleware(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(identity_middleware(secret, req, next))
    }
}
