// src/habits/mod.rs
// Habit tracking: completion ledger, streak engine, toggle coordination

pub mod error;
pub mod ledger;
pub mod models;
pub mod service;
pub mod streak;

pub use error::{HabitError, HabitResult};
pub use models::{CreateHabitRequest, Habit, StreakCache, StreakStats, UpdateHabitRequest};
pub use service::HabitService;
