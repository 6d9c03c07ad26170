// src/api/http/suggestions.rs

use axum::{
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::state::AppState;

/// Returned when the upstream API is unreachable or errors; the endpoint
/// still answers 200 so the client always has something to show.
const FALLBACK_SUGGESTIONS: &str = "\
Based on your current habits, here are some complementary suggestions:
1. Morning Stretching - A gentle way to start your day and complement your exercise routine
2. Journal Writing - Great for reflection and mental clarity alongside meditation
3. Hydration Tracking - Essential for overall health and wellness
These suggestions are generated locally when AI services are unavailable.";

pub fn create_suggestions_router() -> Router<Arc<AppState>> {
    Router::new().route("/ai/habit-suggestions", post(habit_suggestions))
}

#[derive(Debug, Deserialize)]
struct SuggestionRequest {
    #[serde(default)]
    habits: Vec<String>,
}

async fn habit_suggestions(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<SuggestionRequest>,
) -> impl IntoResponse {
    if req.habits.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "No habits provided" })),
        );
    }

    let suggestions = match app_state.suggestion_provider.suggest(&req.habits).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Suggestion API call failed, serving fallback: {}", e);
            FALLBACK_SUGGESTIONS.to_string()
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({ "suggestions": suggestions })),
    )
}
