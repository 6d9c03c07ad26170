// src/api/http/auth.rs

use axum::{
    Router,
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tracing::error;

use crate::auth::{AuthError, AuthResponse, LoginRequest, SignupRequest, User};
use crate::state::AppState;

pub fn create_auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/users", get(list_users))
}

async fn signup(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AuthApiError> {
    let response = app_state.auth_service.signup(req).await?;
    Ok(Json(response))
}

async fn login(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthApiError> {
    let response = app_state.auth_service.login(req).await?;
    Ok(Json(response))
}

async fn list_users(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, AuthApiError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(Json(users))
}

struct AuthApiError(AuthError);

impl From<AuthError> for AuthApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AuthError::EmailTaken => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.0.to_string();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Auth error: {}", message);
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
