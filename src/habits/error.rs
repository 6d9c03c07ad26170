// src/habits/error.rs
// Error types for habit operations

use thiserror::Error;

/// Habit operation error type
#[derive(Error, Debug)]
pub enum HabitError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl HabitError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

/// Habit operation result type
pub type HabitResult<T> = Result<T, HabitError>;
