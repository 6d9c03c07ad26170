// src/api/http/goals.rs

use axum::{
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use std::sync::Arc;
use tracing::error;

use crate::goals::{CreateGoalRequest, Goal};
use crate::state::AppState;

pub fn create_goals_router() -> Router<Arc<AppState>> {
    Router::new().route("/goals", post(create_goal).get(list_goals))
}

async fn create_goal(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<Json<Goal>, GoalApiError> {
    let goal = app_state.goal_service.create(req).await.map_err(GoalApiError)?;
    Ok(Json(goal))
}

async fn list_goals(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Goal>>, GoalApiError> {
    let goals = app_state.goal_service.list().await.map_err(GoalApiError)?;
    Ok(Json(goals))
}

struct GoalApiError(anyhow::Error);

impl IntoResponse for GoalApiError {
    fn into_response(self) -> Response {
        error!("Goal error: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
