/// Liveness and database connectivity
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "schema": "current"
/// }
/// ```
///
/// Always `200 OK`: an unreachable database or unapplied migrations only
/// downgrade `status` to `"degraded"`.

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskmanager_shared::db::{migrations, pool};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,

    /// "current", "pending" or "unknown"
    pub schema: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let schema = if connected {
        match migrations::schema_state(&state.db).await {
            Ok(schema) if schema.is_current() => "current",
            Ok(schema) => {
                tracing::warn!(
                    applied = schema.applied,
                    embedded = schema.embedded,
                    "Database schema is behind"
                );
                "pending"
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read migration state");
                "unknown"
            }
        }
    } else {
        "unknown"
    };

    let healthy = connected && schema == "current";

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        schema: schema.to_string(),
    })
}
