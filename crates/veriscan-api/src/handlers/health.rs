//! Health probes and the root welcome payload.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::state::AppState;

/// `GET /`: service banner.
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "veriscan image authenticity detection API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /health`: liveness probe; the process is up.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "veriscan-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /health/db`: readiness probe; the database answers a trivial query.
pub async fn db_health(state: Arc<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    match tokio::time::timeout(TIMEOUT, sqlx::query("SELECT 1").execute(&state.pool)).await {
        Ok(Ok(_)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "database": "connected",
            })),
        ),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                    "error": e.to_string(),
                })),
            )
        }
        Err(_) => {
            tracing::error!("Database health check timed out");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "database": "timeout",
                })),
            )
        }
    }
}
