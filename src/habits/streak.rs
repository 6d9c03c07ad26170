// src/habits/streak.rs

//! Streak derivation and cache-advance arithmetic.
//!
//! Everything here is a pure function of its arguments. "Today" is always
//! caller-supplied; nothing in this module reads a clock.

use chrono::{Duration, NaiveDate};

use super::models::StreakCache;

/// Whether the streak is already broken by elapsed time alone, before
/// looking at the ledger: no completion on record, or the last completion
/// is more than one day in the past.
pub fn streak_broken(last_completed: Option<NaiveDate>, today: NaiveDate) -> bool {
    match last_completed {
        None => true,
        Some(last) => (today - last).num_days() > 1,
    }
}

/// Derive the current streak from a ledger snapshot.
///
/// `completions` must be in descending date order. The walk starts from an
/// `expected` cursor at `today` and accepts a completion on `expected` or
/// `expected - 1`; the one-day tolerance means a habit completed yesterday
/// but not yet today still reads as an active streak, both on the day of
/// completion and the morning after. The walk stops at the first date that
/// cannot chain; it never skips over a gap.
pub fn compute_streak(
    last_completed: Option<NaiveDate>,
    completions: &[NaiveDate],
    today: NaiveDate,
) -> i64 {
    if streak_broken(last_completed, today) {
        return 0;
    }

    let mut streak = 0;
    let mut expected = today;

    for &date in completions {
        if date == expected || date == expected - Duration::days(1) {
            streak += 1;
            expected = date - Duration::days(1);
        } else {
            break;
        }
    }

    streak
}

/// Advance the cache for a completion recorded today (the toggle-on path).
///
/// Gap of one day extends the streak, same day leaves it alone, anything
/// longer restarts at one. `longest_streak` only ever ratchets up.
pub fn advance_cache(cache: StreakCache, today: NaiveDate) -> StreakCache {
    let current = match cache.last_completed_date {
        None => 1,
        Some(last) => match (today - last).num_days() {
            0 => cache.current_streak,
            1 => cache.current_streak + 1,
            _ => 1,
        },
    };

    StreakCache {
        current_streak: current,
        longest_streak: cache.longest_streak.max(current),
        last_completed_date: Some(today),
    }
}
