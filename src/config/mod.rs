// src/config/mod.rs
// Central configuration for the habit tracker backend

pub mod helpers;
pub mod server;
pub mod suggestions;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref CONFIG: HabitConfig = HabitConfig::from_env();
}

/// Main configuration structure - composes all domain configs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitConfig {
    pub server: server::ServerConfig,
    pub database: server::DatabaseConfig,
    pub logging: server::LoggingConfig,
    pub cors: server::CorsConfig,
    pub suggestions: suggestions::SuggestionConfig,
}

impl HabitConfig {
    pub fn from_env() -> Self {
        // Load .env file; don't panic if it doesn't exist (for production)
        dotenv::dotenv().ok();

        Self {
            server: server::ServerConfig::from_env(),
            database: server::DatabaseConfig::from_env(),
            logging: server::LoggingConfig::from_env(),
            cors: server::CorsConfig::from_env(),
            suggestions: suggestions::SuggestionConfig::from_env(),
        }
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}

impl Default for HabitConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
