//! Calendar-date clock.
//!
//! # Responsibility
//! - Supply "today" as a plain calendar date in local time.
//!
//! # Invariants
//! - Callers capture the date once per logical operation and thread it
//!   through every step, so a day rollover mid-operation cannot split one
//!   toggle across two dates.

use chrono::{Local, NaiveDate};

/// Returns the current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
