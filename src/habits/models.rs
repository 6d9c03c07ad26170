// src/habits/models.rs
// Row and wire types for habits and completions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::sqlite::SqliteRow;

/// A tracked habit, including its denormalized streak cache.
///
/// `current_streak`, `longest_streak`, and `last_completed_date` are a cache
/// over the completion ledger. They are zeroed at creation and mutated only
/// by the toggle path and read-time reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct Habit {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub completed: bool,
    pub category: Option<String>,
    /// Weekday names the habit is scheduled for. Stored and returned, but
    /// not consumed by the streak engine.
    pub scheduled_days: Option<Vec<String>>,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_completed_date: Option<NaiveDate>,
    pub created_at: i64,
}

// Manual FromRow: scheduled_days is a JSON-encoded TEXT column.
impl<'r> FromRow<'r, SqliteRow> for Habit {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;

        let scheduled_json: Option<String> = row.try_get("scheduled_days")?;
        let scheduled_days = scheduled_json
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok());

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            completed: row.try_get("completed")?,
            category: row.try_get("category")?,
            scheduled_days,
            current_streak: row.try_get("current_streak")?,
            longest_streak: row.try_get("longest_streak")?,
            last_completed_date: row.try_get("last_completed_date")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl Habit {
    pub fn cache(&self) -> StreakCache {
        StreakCache {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            last_completed_date: self.last_completed_date,
        }
    }

    pub fn apply_cache(&mut self, cache: StreakCache) {
        self.current_streak = cache.current_streak;
        self.longest_streak = cache.longest_streak;
        self.last_completed_date = cache.last_completed_date;
    }
}

/// The denormalized streak fields of a habit, as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakCache {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub last_completed_date: Option<NaiveDate>,
}

/// Per-user summary statistics across all habits.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StreakStats {
    pub current_streak: i64,
    pub longest_streak: i64,
    pub total_completed: i64,
}

impl StreakStats {
    pub fn zero() -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            total_completed: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    pub category: Option<String>,
    pub scheduled_days: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub scheduled_days: Option<Vec<String>>,
}
