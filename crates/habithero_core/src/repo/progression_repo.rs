//! Progression engine state: contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the single per-child `hero_progress` row.
//! - Provide the sole mutation path for the successful-day counter.
//!
//! # Invariants
//! - `initialize` is an idempotent creation guard: re-calling it never
//!   resets existing progress.
//! - `record_successful_day` is exactly-once per (child, date): the guard
//!   lives in the UPDATE's WHERE clause, so count, level and the guard date
//!   change in one atomic statement and are never observed out of sync.
//! - `successful_days_count` only ever increases; `level` saturates at
//!   `MAX_LEVEL` while the count keeps growing.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::model::habit::ChildId;
use crate::model::progression::{ProgressionState, DAYS_PER_LEVEL, MAX_LEVEL};
use crate::repo::{
    ensure_connection_ready, parse_date, parse_uuid, RepoError, RepoResult, TableRequirement,
};

const PROGRESS_SELECT_SQL: &str = "SELECT
    child_id,
    level,
    successful_days_count,
    last_success_date,
    updated_at
FROM hero_progress";

const PROGRESS_REQUIREMENTS: &[TableRequirement] = &[TableRequirement {
    table: "hero_progress",
    columns: &[
        "child_id",
        "level",
        "successful_days_count",
        "last_success_date",
        "updated_at",
    ],
}];

/// Repository interface for per-child progression state.
pub trait ProgressionRepository {
    /// Creates the state row with level=1, count=0 if it does not exist and
    /// returns the (possibly pre-existing) state unchanged otherwise.
    fn initialize(&self, child_id: ChildId) -> RepoResult<ProgressionState>;

    /// Read-only lookup. `None` means the child has no progression yet; it
    /// is a valid outcome, distinct from storage failure.
    fn get_progression(&self, child_id: ChildId) -> RepoResult<Option<ProgressionState>>;

    /// Records one successful day for `date` and returns the new state.
    ///
    /// When `date` already triggered an increment, the state is returned
    /// unchanged. Callers detect a level-up by comparing the returned level
    /// with the level they observed before the call.
    fn record_successful_day(
        &self,
        child_id: ChildId,
        date: NaiveDate,
    ) -> RepoResult<ProgressionState>;
}

/// SQLite-backed progression state keyed by child id.
pub struct SqliteProgressionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProgressionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, PROGRESS_REQUIREMENTS)?;
        Ok(Self { conn })
    }

    fn load(&self, child_id: ChildId) -> RepoResult<ProgressionState> {
        self.get_progression(child_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "hero_progress row missing for child {child_id} after write"
            ))
        })
    }
}

impl ProgressionRepository for SqliteProgressionRepository<'_> {
    fn initialize(&self, child_id: ChildId) -> RepoResult<ProgressionState> {
        self.conn.execute(
            "INSERT OR IGNORE INTO hero_progress (child_id) VALUES (?1);",
            [child_id.to_string()],
        )?;
        self.load(child_id)
    }

    fn get_progression(&self, child_id: ChildId) -> RepoResult<Option<ProgressionState>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROGRESS_SELECT_SQL} WHERE child_id = ?1;"))?;
        stmt.query_row([child_id.to_string()], |row| {
            Ok(parse_progress_row(row))
        })
        .optional()?
        .transpose()
    }

    fn record_successful_day(
        &self,
        child_id: ChildId,
        date: NaiveDate,
    ) -> RepoResult<ProgressionState> {
        self.conn.execute(
            "INSERT OR IGNORE INTO hero_progress (child_id) VALUES (?1);",
            [child_id.to_string()],
        )?;

        // The date guard sits in the WHERE clause: a repeat call for the
        // same date matches zero rows and leaves the state untouched.
        self.conn.execute(
            "UPDATE hero_progress
             SET
                successful_days_count = successful_days_count + 1,
                level = MIN((successful_days_count + 1) / ?3 + 1, ?4),
                last_success_date = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE child_id = ?1
               AND (last_success_date IS NULL OR last_success_date <> ?2);",
            params![
                child_id.to_string(),
                date.format("%Y-%m-%d").to_string(),
                i64::from(DAYS_PER_LEVEL),
                i64::from(MAX_LEVEL),
            ],
        )?;

        self.load(child_id)
    }
}

fn parse_progress_row(row: &Row<'_>) -> RepoResult<ProgressionState> {
    let child_text: String = row.get("child_id")?;
    let last_success: Option<String> = row.get("last_success_date")?;
    let last_success_date = match last_success {
        Some(value) => Some(parse_date(&value, "hero_progress.last_success_date")?),
        None => None,
    };

    Ok(ProgressionState {
        child_id: parse_uuid(&child_text, "hero_progress.child_id")?,
        level: row.get("level")?,
        successful_days_count: row.get("successful_days_count")?,
        last_success_date,
        updated_at: row.get("updated_at")?,
    })
}
