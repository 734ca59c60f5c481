//! Habit registry contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the per-child `habits` registry.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Listing returns habits in explicit `position` order with a stable id
//!   tie-break.
//! - Deleting a habit is a hard delete; its completion log rows are kept
//!   and become orphans that aggregation ignores.

use rusqlite::{params, Connection, Row};

use crate::model::habit::{ChildId, Habit, HabitId};
use crate::repo::{
    ensure_connection_ready, parse_uuid, RepoError, RepoResult, TableRequirement,
};

const HABIT_SELECT_SQL: &str = "SELECT
    id,
    child_id,
    title,
    icon,
    position
FROM habits";

const HABITS_REQUIREMENTS: &[TableRequirement] = &[TableRequirement {
    table: "habits",
    columns: &["id", "child_id", "title", "icon", "position"],
}];

/// Repository interface for the habit registry.
pub trait HabitRepository {
    /// Creates one habit and returns its stable id.
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId>;
    /// Creates several habits in one transaction (onboarding path).
    fn create_habits(&self, habits: &[Habit]) -> RepoResult<Vec<HabitId>>;
    /// Gets one habit by id.
    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Lists a child's habits ordered by `position ASC, id ASC`.
    fn list_habits(&self, child_id: ChildId) -> RepoResult<Vec<Habit>>;
    /// Replaces title/icon/position of an existing habit.
    fn update_habit(&self, habit: &Habit) -> RepoResult<()>;
    /// Hard-deletes a habit, orphaning its completion log rows.
    fn delete_habit(&self, id: HabitId) -> RepoResult<()>;
}

/// SQLite-backed habit registry.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, HABITS_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<HabitId> {
        insert_habit(self.conn, habit)?;
        Ok(habit.id)
    }

    fn create_habits(&self, habits: &[Habit]) -> RepoResult<Vec<HabitId>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(habits.len());
        for habit in habits {
            insert_habit(&tx, habit)?;
            ids.push(habit.id);
        }
        tx.commit()?;
        Ok(ids)
    }

    fn get_habit(&self, id: HabitId) -> RepoResult<Option<Habit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{HABIT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_habit_row(row)?));
        }
        Ok(None)
    }

    fn list_habits(&self, child_id: ChildId) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL}
             WHERE child_id = ?1
             ORDER BY position ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([child_id.to_string()])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habits
             SET
                title = ?1,
                icon = ?2,
                position = ?3
             WHERE id = ?4;",
            params![
                habit.title.as_str(),
                habit.icon.as_str(),
                habit.position,
                habit.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::HabitNotFound(habit.id));
        }

        Ok(())
    }

    fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::HabitNotFound(id));
        }

        Ok(())
    }
}

fn insert_habit(conn: &Connection, habit: &Habit) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO habits (id, child_id, title, icon, position)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            habit.id.to_string(),
            habit.child_id.to_string(),
            habit.title.as_str(),
            habit.icon.as_str(),
            habit.position,
        ],
    )?;
    Ok(())
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let id_text: String = row.get("id")?;
    let child_text: String = row.get("child_id")?;
    Ok(Habit {
        id: parse_uuid(&id_text, "habits.id")?,
        child_id: parse_uuid(&child_text, "habits.child_id")?,
        title: row.get("title")?,
        icon: row.get("icon")?,
        position: row.get("position")?,
    })
}
