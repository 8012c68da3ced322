// handlers - axum request handlers
//
// public/     no authentication: signup and signin
// protected/  bearer token required: projects and comments

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;

pub mod protected;
pub mod public;

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "killedinlocalhost",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Write-ups of side projects that never left localhost",
        "endpoints": {
            "health": "GET /health (public)",
            "user": "POST /api/v1/user/signup, POST /api/v1/user/signin (public)",
            "projects": "/api/v1/projects[/:id] (bearer)",
            "comments": "/api/v1/projects/:id/comments, DELETE /api/v1/comments/:id (bearer)",
        }
    }))
}

/// GET /health - liveness plus a store ping
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> crate::error::ApiError {
    crate::error::ApiError::not_found("Route not found")
}
