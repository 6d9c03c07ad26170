// src/api/http/habits.rs
//
// Habit endpoints. "Today" is read from the wall clock once per request,
// here at the boundary, and passed down explicitly; the streak engine
// itself is clock-free.

use axum::{
    Router,
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::error;

use crate::habits::{CreateHabitRequest, Habit, HabitError, StreakStats, UpdateHabitRequest};
use crate::state::AppState;

pub fn create_habits_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/habits", post(create_habit))
        .route("/habits/stats/{user_id}", get(user_stats))
        .route(
            "/habits/{id}",
            get(list_user_habits).put(toggle_habit).delete(delete_habit),
        )
        .route("/habits/{id}/update", put(update_habit))
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn create_habit(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateHabitRequest>,
) -> Result<Json<Habit>, HabitApiError> {
    let habit = app_state.habit_service.create(req).await?;
    Ok(Json(habit))
}

/// List a user's habits with read-time streak reconciliation.
async fn list_user_habits(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<Habit>>, HabitApiError> {
    let habits = app_state.habit_service.list_for_user(user_id, today()).await?;
    Ok(Json(habits))
}

/// Flip the habit's completed flag and run the toggle coordinator.
async fn toggle_habit(
    State(app_state): State<Arc<AppState>>,
    Path(habit_id): Path<i64>,
) -> Result<Json<Habit>, HabitApiError> {
    let habit = app_state.habit_service.toggle(habit_id, today()).await?;
    Ok(Json(habit))
}

async fn update_habit(
    State(app_state): State<Arc<AppState>>,
    Path(habit_id): Path<i64>,
    Json(req): Json<UpdateHabitRequest>,
) -> Result<Json<Habit>, HabitApiError> {
    let habit = app_state.habit_service.update(habit_id, req).await?;
    Ok(Json(habit))
}

async fn user_stats(
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<StreakStats>, HabitApiError> {
    let stats = app_state.habit_service.user_stats(user_id, today()).await?;
    Ok(Json(stats))
}

async fn delete_habit(
    State(app_state): State<Arc<AppState>>,
    Path(habit_id): Path<i64>,
) -> Result<Json<serde_json::Value>, HabitApiError> {
    app_state.habit_service.delete(habit_id).await?;
    Ok(Json(serde_json::json!({ "message": "Habit deleted successfully" })))
}

struct HabitApiError(HabitError);

impl From<HabitError> for HabitApiError {
    fn from(err: HabitError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HabitApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            HabitError::NotFound(_) => StatusCode::NOT_FOUND,
            HabitError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.0.to_string();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Habit error: {}", message);
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
