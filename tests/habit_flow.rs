// tests/habit_flow.rs
// End-to-end coverage of the toggle / streak / stats flow against an
// in-memory database.

use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use habit_backend::db;
use habit_backend::habits::{
    CreateHabitRequest, Habit, HabitError, HabitService, StreakStats, UpdateHabitRequest, ledger,
    streak,
};

async fn setup() -> (SqlitePool, HabitService) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init_schema(&pool).await.unwrap();

    sqlx::query(
        "INSERT INTO users (name, email, password_hash, created_at) VALUES ('Asha', 'asha@example.com', 'x', 0)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let service = HabitService::new(pool.clone());
    (pool, service)
}

async fn create_habit(service: &HabitService, name: &str) -> Habit {
    service
        .create(CreateHabitRequest {
            user_id: 1,
            name: name.to_string(),
            completed: false,
            category: Some("health".to_string()),
            scheduled_days: None,
        })
        .await
        .unwrap()
}

/// Drive the habit to "completed" on the given day, toggling through the
/// intermediate off state when the flag is still set from a previous day.
async fn mark_done(service: &HabitService, habit_id: i64, date: NaiveDate) -> Habit {
    let habit = service.get(habit_id).await.unwrap();
    let habit = if habit.completed {
        service.toggle(habit_id, date).await.unwrap()
    } else {
        habit
    };
    assert!(!habit.completed);
    service.toggle(habit_id, date).await.unwrap()
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn scenario_a_new_habit_has_zero_stats() {
    let (_pool, service) = setup().await;
    let today = d("2025-03-10");

    // No habits at all: zeros, not an error.
    assert_eq!(
        service.user_stats(1, today).await.unwrap(),
        StreakStats {
            current_streak: 0,
            longest_streak: 0,
            total_completed: 0
        }
    );

    // One habit, never completed: still zeros.
    let habit = create_habit(&service, "read").await;
    assert_eq!(habit.current_streak, 0);
    assert_eq!(habit.longest_streak, 0);
    assert_eq!(habit.last_completed_date, None);
    assert_eq!(
        service.user_stats(1, today).await.unwrap(),
        StreakStats {
            current_streak: 0,
            longest_streak: 0,
            total_completed: 0
        }
    );
}

#[tokio::test]
async fn scenario_b_first_completion() {
    let (_pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;

    let habit = service.toggle(habit.id, d1).await.unwrap();

    assert!(habit.completed);
    assert_eq!(habit.current_streak, 1);
    assert_eq!(habit.longest_streak, 1);
    assert_eq!(habit.last_completed_date, Some(d1));
}

#[tokio::test]
async fn scenario_c_consecutive_days_extend_streak() {
    let (_pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;

    mark_done(&service, habit.id, d1).await;
    let habit = mark_done(&service, habit.id, d1 + Duration::days(1)).await;

    assert_eq!(habit.current_streak, 2);
    assert_eq!(habit.longest_streak, 2);
    assert_eq!(habit.last_completed_date, Some(d1 + Duration::days(1)));
}

#[tokio::test]
async fn scenario_d_same_day_undo_rolls_back_one_day() {
    let (pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let d2 = d1 + Duration::days(1);
    let habit = create_habit(&service, "read").await;

    mark_done(&service, habit.id, d1).await;
    mark_done(&service, habit.id, d2).await;

    // Undo today's completion.
    let habit = service.toggle(habit.id, d2).await.unwrap();

    assert!(!habit.completed);
    assert_eq!(habit.current_streak, 1);
    assert_eq!(habit.last_completed_date, Some(d1));
    // Longest never decreases on an undo.
    assert_eq!(habit.longest_streak, 2);

    let dates = ledger::all_completions(&pool, habit.id).await.unwrap();
    assert_eq!(dates, vec![d1]);
}

#[tokio::test]
async fn scenario_e_gap_restarts_streak() {
    let (_pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;

    mark_done(&service, habit.id, d1).await;
    // D1+1 skipped entirely.
    let habit = mark_done(&service, habit.id, d1 + Duration::days(2)).await;

    assert_eq!(habit.current_streak, 1);
    assert_eq!(habit.longest_streak, 1);
    assert_eq!(habit.last_completed_date, Some(d1 + Duration::days(2)));
}

#[tokio::test]
async fn repeated_identical_toggles_are_idempotent_on_the_cache() {
    let (pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;

    let habit = service.toggle(habit.id, d1).await.unwrap();
    assert_eq!(habit.current_streak, 1);

    // Force the flag off without touching the ledger, then toggle back on:
    // the ledger already has today's record, so the cache must not move.
    sqlx::query("UPDATE habits SET completed = 0 WHERE id = ?")
        .bind(habit.id)
        .execute(&pool)
        .await
        .unwrap();
    let habit = service.toggle(habit.id, d1).await.unwrap();

    assert!(habit.completed);
    assert_eq!(habit.current_streak, 1);
    assert_eq!(habit.longest_streak, 1);
    assert_eq!(habit.last_completed_date, Some(d1));
    assert_eq!(
        ledger::all_completions(&pool, habit.id).await.unwrap(),
        vec![d1]
    );

    // Symmetric case: flag on with no ledger record for today.
    let d2 = d1 + Duration::days(1);
    let habit = service.toggle(habit.id, d2).await.unwrap();
    assert!(!habit.completed);
    assert_eq!(habit.current_streak, 1);
    assert_eq!(habit.last_completed_date, Some(d1));
}

#[tokio::test]
async fn longest_streak_dominates_current_after_every_toggle() {
    let (_pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;

    let mut day = d1;
    for step in 0..6 {
        let updated = mark_done(&service, habit.id, day).await;
        assert!(updated.longest_streak >= updated.current_streak);

        let undone = service.toggle(habit.id, day).await.unwrap();
        assert!(undone.longest_streak >= undone.current_streak);

        let redone = service.toggle(habit.id, day).await.unwrap();
        assert!(redone.longest_streak >= redone.current_streak);

        // Every third day introduces a gap.
        day += Duration::days(if step % 3 == 2 { 2 } else { 1 });
    }
}

#[tokio::test]
async fn ledger_and_derived_streak_agree_at_last_completed_date() {
    let (pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;

    // A three-day run ending at the last completion, preceded by a gap wide
    // enough that the walk cannot bridge it.
    for offset in [0i64, 4, 5, 6] {
        mark_done(&service, habit.id, d1 + Duration::days(offset)).await;
    }

    let habit = service.get(habit.id).await.unwrap();
    let last = habit.last_completed_date.unwrap();
    let dates = ledger::all_completions(&pool, habit.id).await.unwrap();

    // Count how many records chain consecutively backward from `last`.
    let mut chained = 0;
    let mut expected = last;
    for &date in &dates {
        if date == expected {
            chained += 1;
            expected -= Duration::days(1);
        } else {
            break;
        }
    }

    assert_eq!(streak::compute_streak(Some(last), &dates, last), chained);
    assert_eq!(habit.current_streak, chained);
}

#[tokio::test]
async fn list_refreshes_stale_current_streak() {
    let (pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;
    mark_done(&service, habit.id, d1).await;

    // Five days later the cached streak of 1 is stale.
    let later = d1 + Duration::days(5);
    let habits = service.list_for_user(1, later).await.unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].current_streak, 0);
    assert_eq!(habits[0].longest_streak, 1);

    // And the refreshed value was persisted, not just returned.
    let row: (i64,) = sqlx::query_as("SELECT current_streak FROM habits WHERE id = ?")
        .bind(habit.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.0, 0);
}

#[tokio::test]
async fn list_heals_a_corrupted_cache_from_the_ledger() {
    let (pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;
    mark_done(&service, habit.id, d1).await;

    // Corrupt the cache to claim a streak the ledger cannot support.
    sqlx::query("UPDATE habits SET current_streak = 99, last_completed_date = ? WHERE id = ?")
        .bind(d1 + Duration::days(30))
        .bind(habit.id)
        .execute(&pool)
        .await
        .unwrap();

    let habits = service.list_for_user(1, d1).await.unwrap();
    assert_eq!(habits[0].current_streak, 1);
    assert_eq!(habits[0].last_completed_date, Some(d1));
}

#[tokio::test]
async fn stats_fold_across_habits() {
    let (_pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let today = d1 + Duration::days(1);

    let reading = create_habit(&service, "read").await;
    let running = create_habit(&service, "run").await;

    // Reading: three-day streak ending today.
    for offset in 0..3 {
        mark_done(&service, reading.id, d1 - Duration::days(1) + Duration::days(offset)).await;
    }
    // Running: a two-day streak long broken by today.
    mark_done(&service, running.id, d1 - Duration::days(10)).await;
    mark_done(&service, running.id, d1 - Duration::days(9)).await;

    let stats = service.user_stats(1, today).await.unwrap();
    assert_eq!(stats.current_streak, 3);
    assert_eq!(stats.longest_streak, 3);
    assert_eq!(stats.total_completed, 5);
}

#[tokio::test]
async fn boundary_stale_last_completed_reads_zero_regardless_of_ledger() {
    let (pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;

    for offset in 0..4 {
        mark_done(&service, habit.id, d1 + Duration::days(offset)).await;
    }

    let last = d1 + Duration::days(3);
    let dates = ledger::all_completions(&pool, habit.id).await.unwrap();
    assert_eq!(streak::compute_streak(Some(last), &dates, last), 4);
    // Two days past the last completion: dead, whatever the history says.
    assert_eq!(
        streak::compute_streak(Some(last), &dates, last + Duration::days(2)),
        0
    );

    let stats = service.user_stats(1, last + Duration::days(2)).await.unwrap();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 4);
}

#[tokio::test]
async fn delete_cascades_to_completions() {
    let (pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;
    mark_done(&service, habit.id, d1).await;
    mark_done(&service, habit.id, d1 + Duration::days(1)).await;

    service.delete(habit.id).await.unwrap();

    let habits: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM habits")
        .fetch_one(&pool)
        .await
        .unwrap();
    let completions: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM habit_completions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(habits.0, 0);
    assert_eq!(completions.0, 0);
}

#[tokio::test]
async fn missing_habit_surfaces_not_found() {
    let (_pool, service) = setup().await;
    let today = d("2025-03-10");

    assert!(matches!(
        service.toggle(404, today).await,
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        service.delete(404).await,
        Err(HabitError::NotFound(_))
    ));
    assert!(matches!(
        service
            .create(CreateHabitRequest {
                user_id: 404,
                name: "read".to_string(),
                completed: false,
                category: None,
                scheduled_days: None,
            })
            .await,
        Err(HabitError::NotFound(_))
    ));
}

#[tokio::test]
async fn update_preserves_streak_fields() {
    let (_pool, service) = setup().await;
    let d1 = d("2025-03-10");
    let habit = create_habit(&service, "read").await;
    mark_done(&service, habit.id, d1).await;

    let updated = service
        .update(
            habit.id,
            UpdateHabitRequest {
                name: Some("read fiction".to_string()),
                category: None,
                scheduled_days: Some(vec!["Monday".to_string(), "Friday".to_string()]),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "read fiction");
    assert_eq!(updated.category, Some("health".to_string()));
    assert_eq!(
        updated.scheduled_days,
        Some(vec!["Monday".to_string(), "Friday".to_string()])
    );
    assert_eq!(updated.current_streak, 1);
    assert_eq!(updated.longest_streak, 1);
    assert_eq!(updated.last_completed_date, Some(d1));
}
