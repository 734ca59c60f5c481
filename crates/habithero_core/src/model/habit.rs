//! Habit registry entry.
//!
//! # Responsibility
//! - Define the per-child habit definition ("mission") record.
//! - Provide constructors for onboarding and import paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another habit.
//! - `position` drives display and iteration order; ties are broken by id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a child profile.
///
/// Profiles themselves live in an external collaborator store; the core only
/// treats the id as an opaque ownership key.
pub type ChildId = Uuid;

/// Stable identifier for a habit definition.
pub type HabitId = Uuid;

/// A recurring daily task assigned to one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Stable global ID used for log linkage and editing.
    pub id: HabitId,
    /// Owning child; habits are never shared across children.
    pub child_id: ChildId,
    /// Display title shown on the mission card.
    pub title: String,
    /// Display icon (emoji) shown on the mission card.
    pub icon: String,
    /// Explicit order index; lower values are listed first.
    pub position: i64,
}

impl Habit {
    /// Creates a new habit with a generated stable ID.
    pub fn new(
        child_id: ChildId,
        title: impl Into<String>,
        icon: impl Into<String>,
        position: i64,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), child_id, title, icon, position)
    }

    /// Creates a habit with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: HabitId,
        child_id: ChildId,
        title: impl Into<String>,
        icon: impl Into<String>,
        position: i64,
    ) -> Self {
        Self {
            id,
            child_id,
            title: title.into(),
            icon: icon.into(),
            position,
        }
    }
}
