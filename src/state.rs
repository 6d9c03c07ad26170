// src/state.rs
// Application state shared across handlers

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::CONFIG;
use crate::goals::GoalService;
use crate::habits::HabitService;
use crate::suggestions::{PerplexityClient, SuggestionProvider};

pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub habit_service: Arc<HabitService>,
    pub goal_service: Arc<GoalService>,
    pub suggestion_provider: Arc<dyn SuggestionProvider>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Result<Self> {
        let auth_service = Arc::new(AuthService::new(pool.clone()));
        let habit_service = Arc::new(HabitService::new(pool.clone()));
        let goal_service = Arc::new(GoalService::new(pool.clone()));

        // Suggestion credentials are handed to the client here; nothing in
        // the suggestion path reads the environment after startup.
        let suggestion_provider: Arc<dyn SuggestionProvider> =
            Arc::new(PerplexityClient::new(CONFIG.suggestions.clone())?);

        Ok(Self {
            pool,
            auth_service,
            habit_service,
            goal_service,
            suggestion_provider,
        })
    }
}
