//! Domain model for the habit progression engine.
//!
//! # Responsibility
//! - Define the canonical records for habits, completion facts and hero
//!   progression state.
//! - Keep derived aggregates (day summaries) as transient values, never
//!   persisted shapes.
//!
//! # Invariants
//! - Every persisted record is identified by a stable UUID (or, for
//!   progression, by the owning child).
//! - All dates are calendar dates; no time-of-day granularity anywhere.

pub mod completion;
pub mod day_summary;
pub mod habit;
pub mod progression;
pub mod templates;
