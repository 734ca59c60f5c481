//! Daily completion log contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the per-habit, per-date boolean completion record.
//! - Provide point lookups, inclusive range queries and upsert toggling.
//!
//! # Invariants
//! - At most one row per (habit, date): `set_completion` is a single-
//!   statement upsert backed by a unique index, so repeated calls with the
//!   same arguments converge on one row and never tear it.
//! - Read paths fail loudly with `InvariantViolation` when duplicate rows
//!   for one habit+date are observed instead of silently picking one.

use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::model::completion::CompletionRecord;
use crate::model::habit::{ChildId, HabitId};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_date, parse_flag, parse_uuid, RepoError,
    RepoResult, TableRequirement,
};

const LOG_SELECT_SQL: &str = "SELECT
    id,
    child_id,
    habit_id,
    date,
    completed
FROM habit_logs";

const LOG_REQUIREMENTS: &[TableRequirement] = &[
    TableRequirement {
        table: "habit_logs",
        columns: &["id", "child_id", "habit_id", "date", "completed"],
    },
    TableRequirement {
        table: "habits",
        columns: &["id"],
    },
];

/// Repository interface for the daily completion log.
pub trait CompletionRepository {
    /// Returns all of a child's records for one exact date.
    fn completions_for_date(
        &self,
        child_id: ChildId,
        date: NaiveDate,
    ) -> RepoResult<Vec<CompletionRecord>>;

    /// Returns records within `[start, end]` inclusive, ordered by
    /// `date DESC` with a stable id tie-break within each date.
    fn completions_in_range(
        &self,
        child_id: ChildId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<CompletionRecord>>;

    /// Upserts the completion flag for (habit, date) and returns the
    /// resulting record. Fails with `HabitNotFound` when the habit is not
    /// in the registry.
    fn set_completion(
        &self,
        child_id: ChildId,
        habit_id: HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> RepoResult<CompletionRecord>;
}

/// SQLite-backed completion log.
pub struct SqliteCompletionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCompletionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, LOG_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl CompletionRepository for SqliteCompletionRepository<'_> {
    fn completions_for_date(
        &self,
        child_id: ChildId,
        date: NaiveDate,
    ) -> RepoResult<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL}
             WHERE child_id = ?1
               AND date = ?2
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![child_id.to_string(), date_text(date)])?;
        collect_records(&mut rows)
    }

    fn completions_in_range(
        &self,
        child_id: ChildId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL}
             WHERE child_id = ?1
               AND date >= ?2
               AND date <= ?3
             ORDER BY date DESC, id ASC;"
        ))?;
        let mut rows = stmt.query(params![
            child_id.to_string(),
            date_text(start),
            date_text(end)
        ])?;
        collect_records(&mut rows)
    }

    fn set_completion(
        &self,
        child_id: ChildId,
        habit_id: HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> RepoResult<CompletionRecord> {
        if !habit_exists(self.conn, habit_id)? {
            return Err(RepoError::HabitNotFound(habit_id));
        }

        // One statement keyed on the (habit_id, date) unique index: an
        // existing row keeps its id and only flips the flag.
        self.conn.execute(
            "INSERT INTO habit_logs (id, child_id, habit_id, date, completed)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(habit_id, date) DO UPDATE SET completed = excluded.completed;",
            params![
                Uuid::new_v4().to_string(),
                child_id.to_string(),
                habit_id.to_string(),
                date_text(date),
                bool_to_int(completed),
            ],
        )?;

        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL}
             WHERE habit_id = ?1
               AND date = ?2;"
        ))?;
        let mut rows = stmt.query(params![habit_id.to_string(), date_text(date)])?;
        let row = rows.next()?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "habit_logs row missing after upsert for habit {habit_id} on {date}"
            ))
        })?;
        let record = parse_log_row(row)?;

        if rows.next()?.is_some() {
            return Err(RepoError::InvariantViolation(format!(
                "multiple habit_logs rows for habit {habit_id} on {date}"
            )));
        }

        Ok(record)
    }
}

fn collect_records(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<CompletionRecord>> {
    let mut records = Vec::new();
    let mut seen: HashSet<(HabitId, NaiveDate)> = HashSet::new();
    while let Some(row) = rows.next()? {
        let record = parse_log_row(row)?;
        if !seen.insert((record.habit_id, record.date)) {
            return Err(RepoError::InvariantViolation(format!(
                "multiple habit_logs rows for habit {} on {}",
                record.habit_id, record.date
            )));
        }
        records.push(record);
    }
    Ok(records)
}

fn parse_log_row(row: &Row<'_>) -> RepoResult<CompletionRecord> {
    let id_text: String = row.get("id")?;
    let child_text: String = row.get("child_id")?;
    let habit_text: String = row.get("habit_id")?;
    let date_value: String = row.get("date")?;
    let completed_value: i64 = row.get("completed")?;

    Ok(CompletionRecord {
        id: parse_uuid(&id_text, "habit_logs.id")?,
        child_id: parse_uuid(&child_text, "habit_logs.child_id")?,
        habit_id: parse_uuid(&habit_text, "habit_logs.habit_id")?,
        date: parse_date(&date_value, "habit_logs.date")?,
        completed: parse_flag(completed_value, "habit_logs.completed")?,
    })
}

fn habit_exists(conn: &Connection, habit_id: HabitId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM habits WHERE id = ?1);",
        [habit_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
