//! Mission use-case service: the composite toggle flow.
//!
//! # Responsibility
//! - Combine the completion log, the day aggregator and the progression
//!   engine into the `toggle_habit` operation the UI calls.
//! - Provide the read-path day summary and history entry points.
//!
//! # Invariants
//! - `toggle_habit` runs inside one transaction: a failure at any step
//!   rolls back both the log upsert and any progression advance, so the two
//!   writes never diverge.
//! - Progression advances at most once per (child, date), even when two
//!   toggles complete the same last habit; the persisted date guard refuses
//!   the second increment.
//! - Every operation takes an explicit date; the service never reads the
//!   clock on its own.

use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;

use crate::model::completion::CompletionRecord;
use crate::model::day_summary::{summarize, DaySummary};
use crate::model::habit::{ChildId, HabitId};
use crate::model::progression::ProgressionState;
use crate::repo::completion_repo::{CompletionRepository, SqliteCompletionRepository};
use crate::repo::habit_repo::{HabitRepository, SqliteHabitRepository};
use crate::repo::progression_repo::{ProgressionRepository, SqliteProgressionRepository};
use crate::repo::RepoResult;
use crate::service::history_service::build_history;

/// Result of one `toggle_habit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The upserted completion record.
    pub record: CompletionRecord,
    /// The day's summary after the toggle.
    pub summary: DaySummary,
    /// Progression state after the toggle; `None` when the child has no
    /// progression row yet and the toggle did not complete the day.
    pub progression: Option<ProgressionState>,
    /// True when this toggle pushed the level up.
    pub leveled_up: bool,
}

/// Composite service over one SQLite connection.
///
/// The toggle path needs cross-repository atomicity, so this service is
/// storage-bound and builds its repositories over a shared transaction.
/// Read paths go through the same repository contracts without one.
pub struct MissionService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> MissionService<'conn> {
    /// Creates a service over a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Toggles one habit for (child, date) and advances progression when
    /// the toggle completes the day.
    ///
    /// The caller supplies `date` once (see `clock::today`) so every step
    /// of the operation observes the same calendar day.
    pub fn toggle_habit(
        &self,
        child_id: ChildId,
        habit_id: HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> RepoResult<ToggleOutcome> {
        let tx = self.conn.unchecked_transaction()?;

        let outcome = {
            let habits = SqliteHabitRepository::try_new(&tx)?;
            let completions = SqliteCompletionRepository::try_new(&tx)?;
            let progression = SqliteProgressionRepository::try_new(&tx)?;

            let before = progression.get_progression(child_id)?;
            let record = completions.set_completion(child_id, habit_id, date, completed)?;

            let registry = habits.list_habits(child_id)?;
            let day_records = completions.completions_for_date(child_id, date)?;
            let summary = summarize(date, &registry, &day_records);

            let (state, leveled_up) = if completed && summary.fully_completed {
                let level_before = before.as_ref().map_or(1, |state| state.level);
                let after = progression.record_successful_day(child_id, date)?;
                let leveled_up = after.level > level_before;
                info!(
                    "event=day_completed module=service status=ok child={child_id} date={date} count={} level={} leveled_up={leveled_up}",
                    after.successful_days_count, after.level
                );
                (Some(after), leveled_up)
            } else {
                (before, false)
            };

            ToggleOutcome {
                record,
                summary,
                progression: state,
                leveled_up,
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Aggregates one day's summary from the registry and the log.
    pub fn summary_for_date(&self, child_id: ChildId, date: NaiveDate) -> RepoResult<DaySummary> {
        let habits = SqliteHabitRepository::try_new(self.conn)?;
        let completions = SqliteCompletionRepository::try_new(self.conn)?;

        let registry = habits.list_habits(child_id)?;
        let day_records = completions.completions_for_date(child_id, date)?;
        Ok(summarize(date, &registry, &day_records))
    }

    /// Rebuilds the rolling history window ending at `reference_date`.
    pub fn history(
        &self,
        child_id: ChildId,
        window_days: u32,
        reference_date: NaiveDate,
    ) -> RepoResult<Vec<DaySummary>> {
        let habits = SqliteHabitRepository::try_new(self.conn)?;
        let completions = SqliteCompletionRepository::try_new(self.conn)?;
        build_history(&habits, &completions, child_id, window_days, reference_date)
    }
}
