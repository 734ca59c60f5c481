//! Core progression and completion-tracking engine for the HabitHero app.
//! This crate is the single source of truth for business invariants: how
//! daily completions aggregate into successful days, and how successful days
//! roll up into hero levels.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::completion::{CompletionId, CompletionRecord};
pub use model::day_summary::{summarize, DaySummary};
pub use model::habit::{ChildId, Habit, HabitId};
pub use model::progression::{
    level_for_count, level_title, ProgressionState, DAYS_PER_LEVEL, MAX_LEVEL,
};
pub use model::templates::{default_templates, starter_habits, AgeGroup, HabitTemplate};
pub use repo::completion_repo::{CompletionRepository, SqliteCompletionRepository};
pub use repo::habit_repo::{HabitRepository, SqliteHabitRepository};
pub use repo::progression_repo::{ProgressionRepository, SqliteProgressionRepository};
pub use repo::{RepoError, RepoResult};
pub use service::clock::today;
pub use service::history_service::{build_history, HISTORY_WINDOW_DAYS};
pub use service::mission_service::{MissionService, ToggleOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
