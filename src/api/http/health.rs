// src/api/http/health.rs
//
// Health check and readiness endpoints for load balancers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    db: &'static str,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    schema: &'static str,
}

/// Health check endpoint.
/// Returns 200 if the database answers, 503 otherwise.
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_ok = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    let response = HealthResponse {
        status: if db_ok { "healthy" } else { "unhealthy" },
        db: if db_ok { "ok" } else { "error" },
    };

    if db_ok {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Readiness probe: verifies the schema has been initialized.
///
/// GET /ready
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let schema_ok = sqlx::query("SELECT 1 FROM habits LIMIT 1")
        .fetch_optional(&state.pool)
        .await
        .is_ok();

    let response = ReadyResponse {
        status: if schema_ok { "ready" } else { "not_ready" },
        schema: if schema_ok { "present" } else { "missing" },
    };

    if schema_ok {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Liveness probe - simple ping to verify the server is running.
///
/// GET /live
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "alive"})))
}
