//! Rolling-window history reconstruction.
//!
//! # Responsibility
//! - Rebuild a fixed-length window of day summaries for display, most
//!   recent first.
//!
//! # Invariants
//! - The output always has exactly `window_days` entries with contiguous,
//!   strictly descending dates; days without records still yield a summary
//!   with `completed_count = 0`.
//! - The habit registry is snapshotted once, "as of now": habits deleted
//!   after a day has passed retroactively shrink that day's `total_count`.
//!   This mirrors the product's original behavior and is kept on purpose.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::model::completion::CompletionRecord;
use crate::model::day_summary::{summarize, DaySummary};
use crate::model::habit::ChildId;
use crate::repo::completion_repo::CompletionRepository;
use crate::repo::habit_repo::HabitRepository;
use crate::repo::RepoResult;

/// Default display window: two weeks, matching the parent dashboard.
pub const HISTORY_WINDOW_DAYS: u32 = 14;

/// Builds day summaries for the `window_days` days ending at
/// `reference_date`, most recent first.
///
/// Fetches the registry once and the completion log with a single inclusive
/// range query, then aggregates each day in memory.
pub fn build_history<H, C>(
    habits: &H,
    completions: &C,
    child_id: ChildId,
    window_days: u32,
    reference_date: NaiveDate,
) -> RepoResult<Vec<DaySummary>>
where
    H: HabitRepository,
    C: CompletionRepository,
{
    if window_days == 0 {
        return Ok(Vec::new());
    }

    let registry = habits.list_habits(child_id)?;
    let start = reference_date - Duration::days(i64::from(window_days) - 1);
    let records = completions.completions_in_range(child_id, start, reference_date)?;

    let mut by_date: HashMap<NaiveDate, Vec<CompletionRecord>> = HashMap::new();
    for record in records {
        by_date.entry(record.date).or_default().push(record);
    }

    let mut history = Vec::with_capacity(window_days as usize);
    for offset in 0..window_days {
        let date = reference_date - Duration::days(i64::from(offset));
        let day_records = by_date.remove(&date).unwrap_or_default();
        history.push(summarize(date, &registry, &day_records));
    }

    Ok(history)
}
