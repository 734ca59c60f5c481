//! Daily completion fact.
//!
//! # Responsibility
//! - Represent the boolean fact "habit H was completed on date D".
//!
//! # Invariants
//! - At most one record exists per (habit, date) pair; the log layer
//!   enforces this with upsert semantics and a unique index.
//! - `date` is a plain calendar date, stored as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::habit::{ChildId, HabitId};

/// Stable identifier for a completion record.
pub type CompletionId = Uuid;

/// One per-habit, per-date completion entry in the daily log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Stable row id; preserved across repeated toggles of the same day.
    pub id: CompletionId,
    /// Owning child.
    pub child_id: ChildId,
    /// Habit this fact refers to. May point at a since-deleted habit;
    /// aggregation ignores such orphans.
    pub habit_id: HabitId,
    /// Calendar date the completion applies to.
    pub date: NaiveDate,
    /// Whether the habit was completed on `date`.
    pub completed: bool,
}

impl CompletionRecord {
    /// Creates a fresh record with a generated id.
    pub fn new(child_id: ChildId, habit_id: HabitId, date: NaiveDate, completed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            child_id,
            habit_id,
            date,
            completed,
        }
    }
}
