// src/auth/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public user representation (never carries the password hash).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Internal row type used by the auth service.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithPassword {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub created_at: i64,
}

impl From<UserWithPassword> for User {
    fn from(user: UserWithPassword) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
