// src/habits/service.rs
// Habit CRUD, the toggle coordinator, and streak reconciliation

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::error::{HabitError, HabitResult};
use super::ledger;
use super::models::{CreateHabitRequest, Habit, StreakStats, UpdateHabitRequest};
use super::streak;

pub struct HabitService {
    pool: SqlitePool,
}

impl HabitService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a habit with a zeroed streak cache.
    ///
    /// A habit may be created with `completed = true`, but only a toggle
    /// transition ever writes the ledger.
    pub async fn create(&self, req: CreateHabitRequest) -> HabitResult<Habit> {
        let user_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(req.user_id)
            .fetch_one(&self.pool)
            .await?;
        if user_count.0 == 0 {
            return Err(HabitError::not_found("User"));
        }

        let scheduled_json = req
            .scheduled_days
            .as_ref()
            .map(|days| serde_json::to_string(days).unwrap_or_default());

        let result = sqlx::query(
            r#"
            INSERT INTO habits (user_id, name, completed, category, scheduled_days,
                                current_streak, longest_streak, created_at)
            VALUES (?, ?, ?, ?, ?, 0, 0, ?)
            "#,
        )
        .bind(req.user_id)
        .bind(&req.name)
        .bind(req.completed)
        .bind(&req.category)
        .bind(&scheduled_json)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        debug!("Created habit {} for user {}", result.last_insert_rowid(), req.user_id);
        self.get(result.last_insert_rowid()).await
    }

    pub async fn get(&self, habit_id: i64) -> HabitResult<Habit> {
        sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| HabitError::not_found("Habit"))
    }

    /// List a user's habits ordered by id, refreshing each habit's current
    /// streak from the ledger before returning it (read-time
    /// reconciliation). A stale cache is silently overwritten.
    pub async fn list_for_user(&self, user_id: i64, today: NaiveDate) -> HabitResult<Vec<Habit>> {
        let mut habits =
            sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE user_id = ? ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let mut conn = self.pool.acquire().await?;
        for habit in &mut habits {
            Self::reconcile(&mut conn, habit, today).await?;
        }

        Ok(habits)
    }

    /// Apply one toggle transition: the `completed` flag flips, and the
    /// ledger and streak cache move together in a single transaction.
    ///
    /// Turned on with no record for today: record today and advance the
    /// cache. Turned off with a record for today: drop the record and
    /// re-derive the cache from what remains (`longest_streak` never
    /// decreases). If the ledger already matches the requested transition,
    /// the cache is left untouched, so repeated identical toggles are
    /// idempotent.
    pub async fn toggle(&self, habit_id: i64, today: NaiveDate) -> HabitResult<Habit> {
        let mut tx = self.pool.begin().await?;

        let mut habit = sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| HabitError::not_found("Habit"))?;

        habit.completed = !habit.completed;
        let completed_today = ledger::has_completion(&mut *tx, habit_id, today).await?;

        if habit.completed && !completed_today {
            ledger::add_completion(&mut *tx, habit_id, today).await?;
            habit.apply_cache(streak::advance_cache(habit.cache(), today));
            debug!(
                "Habit {} completed on {}: streak {} (longest {})",
                habit_id, today, habit.current_streak, habit.longest_streak
            );
        } else if !habit.completed && completed_today {
            ledger::remove_completion(&mut *tx, habit_id, today).await?;
            Self::reconcile(&mut tx, &mut habit, today).await?;
            debug!(
                "Habit {} uncompleted on {}: streak recomputed to {}",
                habit_id, today, habit.current_streak
            );
        }

        sqlx::query(
            r#"
            UPDATE habits
            SET completed = ?, current_streak = ?, longest_streak = ?, last_completed_date = ?
            WHERE id = ?
            "#,
        )
        .bind(habit.completed)
        .bind(habit.current_streak)
        .bind(habit.longest_streak)
        .bind(habit.last_completed_date)
        .bind(habit_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(habit)
    }

    /// Partial field update. Streak fields are never touched here.
    pub async fn update(&self, habit_id: i64, req: UpdateHabitRequest) -> HabitResult<Habit> {
        let habit = self.get(habit_id).await?;

        let name = req.name.unwrap_or(habit.name);
        let category = req.category.or(habit.category);
        let scheduled_days = req.scheduled_days.or(habit.scheduled_days);
        let scheduled_json = scheduled_days
            .as_ref()
            .map(|days| serde_json::to_string(days).unwrap_or_default());

        sqlx::query("UPDATE habits SET name = ?, category = ?, scheduled_days = ? WHERE id = ?")
            .bind(&name)
            .bind(&category)
            .bind(&scheduled_json)
            .bind(habit_id)
            .execute(&self.pool)
            .await?;

        self.get(habit_id).await
    }

    /// Delete a habit and all its completion records in one transaction.
    pub async fn delete(&self, habit_id: i64) -> HabitResult<()> {
        let mut tx = self.pool.begin().await?;

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_one(&mut *tx)
            .await?;
        if count.0 == 0 {
            return Err(HabitError::not_found("Habit"));
        }

        ledger::delete_for_habit(&mut *tx, habit_id).await?;
        sqlx::query("DELETE FROM habits WHERE id = ?")
            .bind(habit_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!("Deleted habit {} and its completions", habit_id);
        Ok(())
    }

    /// Fold streaks across a user's habits.
    ///
    /// Current streaks are recomputed live from the ledger on every call
    /// rather than trusted from the cache; longest streaks come from the
    /// cache. A user with no habits gets the all-zero result.
    pub async fn user_stats(&self, user_id: i64, today: NaiveDate) -> HabitResult<StreakStats> {
        let habits =
            sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE user_id = ? ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        if habits.is_empty() {
            return Ok(StreakStats::zero());
        }

        let mut conn = self.pool.acquire().await?;
        let mut current_streak = 0;
        let mut longest_streak = 0;
        for habit in &habits {
            let (live, _) = Self::live_streak(&mut conn, habit.id, today).await?;
            current_streak = current_streak.max(live);
            longest_streak = longest_streak.max(habit.longest_streak);
        }

        let total_completed = ledger::count_for_user(&mut *conn, user_id).await?;

        Ok(StreakStats {
            current_streak,
            longest_streak,
            total_completed,
        })
    }

    /// Derive the current streak for a habit straight from the ledger.
    ///
    /// Anchored on the ledger's most recent completion; the broken-streak
    /// predicate runs first so a dead streak never pays for the full
    /// history query.
    async fn live_streak(
        conn: &mut SqliteConnection,
        habit_id: i64,
        today: NaiveDate,
    ) -> HabitResult<(i64, Option<NaiveDate>)> {
        let last = ledger::most_recent_completion(&mut *conn, habit_id).await?;
        if streak::streak_broken(last, today) {
            return Ok((0, last));
        }

        let dates = ledger::all_completions(&mut *conn, habit_id).await?;
        Ok((streak::compute_streak(last, &dates, today), last))
    }

    /// Recompute the streak cache from the ledger and persist it if it
    /// drifted. Shared by the toggle-off branch and the list read path.
    /// `longest_streak` never decreases, but it does ratchet up when the
    /// derived streak exceeds it, keeping longest >= current under the
    /// walk's one-day tolerance.
    async fn reconcile(
        conn: &mut SqliteConnection,
        habit: &mut Habit,
        today: NaiveDate,
    ) -> HabitResult<bool> {
        let (current, last) = Self::live_streak(&mut *conn, habit.id, today).await?;
        let longest = habit.longest_streak.max(current);

        let drifted = current != habit.current_streak
            || longest != habit.longest_streak
            || last != habit.last_completed_date;
        if drifted {
            sqlx::query(
                r#"
                UPDATE habits
                SET current_streak = ?, longest_streak = ?, last_completed_date = ?
                WHERE id = ?
                "#,
            )
            .bind(current)
            .bind(longest)
            .bind(last)
            .bind(habit.id)
            .execute(&mut *conn)
            .await?;
            habit.current_streak = current;
            habit.longest_streak = longest;
            habit.last_completed_date = last;
        }

        Ok(drifted)
    }
}
