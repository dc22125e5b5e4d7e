/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and password policy
/// - [`jwt`]: access/refresh token generation and validation
/// - [`middleware`]: resolves the request's [`middleware::Actor`] from its bearer token
/// - [`authorization`]: the guard layer producing allow/deny decisions
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::authorization::{authorize, Action};
/// use taskmanager_shared::auth::middleware::Actor;
/// use uuid::Uuid;
///
/// let actor = Actor::new(Uuid::new_v4());
///
/// assert!(authorize(Some(&actor), Action::CreateTask).is_allowed());
/// assert!(!authorize(None, Action::CreateTask).is_allowed());
/// ```

pub mod password;
pub mod jwt;
pub mod middleware;
pub mod authorization;
