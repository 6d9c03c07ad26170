// src/config/server.rs
// Server, database, and infrastructure configuration

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: super::helpers::env_or("HABIT_HOST", "127.0.0.1"),
            port: super::helpers::env_parsed("HABIT_PORT", 8000),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            // mode=rwc so a fresh checkout creates its database file
            url: super::helpers::env_or("DATABASE_URL", "sqlite://habits.db?mode=rwc"),
            max_connections: super::helpers::env_parsed("SQLITE_MAX_CONNECTIONS", 5),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: super::helpers::env_or("HABIT_LOG_LEVEL", "info"),
        }
    }
}

/// CORS configuration. Defaults cover the Vite dev server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self {
            allowed_origins: super::helpers::env_list(
                "CORS_ALLOWED_ORIGINS",
                &["http://localhost:5173", "http://127.0.0.1:5173"],
            ),
        }
    }
}
