/// Middleware modules for the API server
///
/// Identity resolution lives in `taskmanager_shared::auth::middleware`;
/// this module holds the HTTP-only layers.

pub mod security;
