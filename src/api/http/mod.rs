// src/api/http/mod.rs

pub mod auth;
pub mod goals;
pub mod habits;
pub mod health;
pub mod suggestions;

pub use auth::create_auth_router;
pub use goals::create_goals_router;
pub use habits::create_habits_router;
pub use health::{health_check, liveness_check, readiness_check};
pub use suggestions::create_suggestions_router;
