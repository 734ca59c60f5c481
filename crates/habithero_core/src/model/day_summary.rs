//! Day aggregation over registry + log data.
//!
//! # Responsibility
//! - Derive one day's completion summary from already-fetched data.
//!
//! # Invariants
//! - `summarize` performs no I/O; callers fetch registry and log rows first.
//! - `fully_completed` is false for an empty registry, so an empty routine
//!   is never celebrated.
//! - Records referencing habits outside the given registry are ignored;
//!   `total_count` is driven by the live registry only.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::completion::CompletionRecord;
use crate::model::habit::{Habit, HabitId};

/// Transient completion summary for one calendar day. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    /// The day this summary describes.
    pub date: NaiveDate,
    /// Habits from the registry with a `completed = true` record.
    pub completed_count: u32,
    /// Size of the registry as of query time.
    pub total_count: u32,
    /// True when every registered habit was completed and the registry is
    /// non-empty.
    pub fully_completed: bool,
}

/// Derives a [`DaySummary`] for `date` from the current habit registry and
/// that day's completion records.
///
/// Habits with no record count as not completed. Records for habits missing
/// from `habits` (deleted since) are skipped.
pub fn summarize(date: NaiveDate, habits: &[Habit], records: &[CompletionRecord]) -> DaySummary {
    let completed_ids: HashSet<HabitId> = records
        .iter()
        .filter(|record| record.completed)
        .map(|record| record.habit_id)
        .collect();

    let total_count = habits.len() as u32;
    let completed_count = habits
        .iter()
        .filter(|habit| completed_ids.contains(&habit.id))
        .count() as u32;

    DaySummary {
        date,
        completed_count,
        total_count,
        fully_completed: completed_count == total_count && total_count > 0,
    }
}
