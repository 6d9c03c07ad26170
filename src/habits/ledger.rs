// src/habits/ledger.rs

//! The completion ledger: one row per (habit, date) a habit was completed.
//!
//! This is the source of truth the streak cache is derived from. Every
//! operation is a single SQL statement and is generic over the executor, so
//! the same functions run against the pool or inside a toggle transaction.

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::Sqlite;

use super::error::HabitResult;

/// Whether a completion record exists for the habit on the given date.
pub async fn has_completion<'e, E>(executor: E, habit_id: i64, date: NaiveDate) -> HabitResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM habit_completions WHERE habit_id = ? AND completed_date = ?",
    )
    .bind(habit_id)
    .bind(date)
    .fetch_one(executor)
    .await?;

    Ok(count.0 > 0)
}

/// Record a completion. Idempotent: inserting a date that is already present
/// is a successful no-op, enforced by the UNIQUE(habit_id, completed_date)
/// index.
pub async fn add_completion<'e, E>(executor: E, habit_id: i64, date: NaiveDate) -> HabitResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO habit_completions (habit_id, completed_date, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(habit_id)
    .bind(date)
    .bind(Utc::now().timestamp())
    .execute(executor)
    .await?;

    Ok(())
}

/// Remove the completion record for the given date, if present.
pub async fn remove_completion<'e, E>(
    executor: E,
    habit_id: i64,
    date: NaiveDate,
) -> HabitResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM habit_completions WHERE habit_id = ? AND completed_date = ?")
        .bind(habit_id)
        .bind(date)
        .execute(executor)
        .await?;

    Ok(())
}

/// The most recent completion date for a habit, or None.
pub async fn most_recent_completion<'e, E>(
    executor: E,
    habit_id: i64,
) -> HabitResult<Option<NaiveDate>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    // ISO dates sort lexicographically, so MAX over the TEXT column is the
    // latest date.
    let last: Option<NaiveDate> = sqlx::query_scalar(
        "SELECT MAX(completed_date) FROM habit_completions WHERE habit_id = ?",
    )
    .bind(habit_id)
    .fetch_one(executor)
    .await?;

    Ok(last)
}

/// All completion dates for a habit, most recent first.
pub async fn all_completions<'e, E>(executor: E, habit_id: i64) -> HabitResult<Vec<NaiveDate>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let dates = sqlx::query_scalar(
        r#"
        SELECT completed_date FROM habit_completions
        WHERE habit_id = ?
        ORDER BY completed_date DESC
        "#,
    )
    .bind(habit_id)
    .fetch_all(executor)
    .await?;

    Ok(dates)
}

/// Total completion count across all of a user's habits.
pub async fn count_for_user<'e, E>(executor: E, user_id: i64) -> HabitResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let count: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM habit_completions c
        JOIN habits h ON h.id = c.habit_id
        WHERE h.user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(count.0)
}

/// Delete every completion record for a habit (habit deletion cascade).
pub async fn delete_for_habit<'e, E>(executor: E, habit_id: i64) -> HabitResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM habit_completions WHERE habit_id = ?")
        .bind(habit_id)
        .execute(executor)
        .await?;

    Ok(())
}
