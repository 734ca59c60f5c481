//! Hero progression state and level math.
//!
//! # Responsibility
//! - Define the per-child level / successful-day-count state.
//! - Own the level formula and its saturation rule in one place.
//!
//! # Invariants
//! - Exactly one state exists per child (single row keyed by child id).
//! - `successful_days_count` is monotonically non-decreasing.
//! - `level` always equals `level_for_count(successful_days_count)` after a
//!   mutation; the two are written together, never separately.
//! - `last_success_date` records the calendar date that last triggered an
//!   increment; it is the exactly-once guard for day-completion events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::habit::ChildId;

/// Successful days required to advance one level.
pub const DAYS_PER_LEVEL: u32 = 5;

/// Highest reachable level; the day count keeps growing past it.
pub const MAX_LEVEL: u32 = 5;

/// Per-child progression state, mutated only by the progression engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Owning child; also the storage key.
    pub child_id: ChildId,
    /// Current hero level, within `[1, MAX_LEVEL]`.
    pub level: u32,
    /// Total days on which every habit was completed. Never decreases.
    pub successful_days_count: u32,
    /// Date that last incremented the count, if any. A second increment for
    /// the same date is refused.
    pub last_success_date: Option<NaiveDate>,
    /// Epoch milliseconds of the last mutation.
    pub updated_at: i64,
}

impl ProgressionState {
    /// Days still needed to reach the next level, or 0 once saturated.
    pub fn days_to_next_level(&self) -> u32 {
        if self.level >= MAX_LEVEL {
            return 0;
        }
        (self.level * DAYS_PER_LEVEL).saturating_sub(self.successful_days_count)
    }

    /// Display title for the current level.
    pub fn title(&self) -> &'static str {
        level_title(self.level)
    }
}

/// Maps a cumulative successful-day count to a level.
///
/// `count / DAYS_PER_LEVEL + 1` grows without bound; the `min` clamp is what
/// makes the level saturate at [`MAX_LEVEL`].
pub fn level_for_count(count: u32) -> u32 {
    (count / DAYS_PER_LEVEL + 1).min(MAX_LEVEL)
}

/// Display title for a level. Out-of-range values fall back to level 1.
pub fn level_title(level: u32) -> &'static str {
    match level {
        2 => "Rising Star",
        3 => "Skilled Hero",
        4 => "Master Hero",
        5 => "Legendary Hero",
        _ => "Beginner Hero",
    }
}
